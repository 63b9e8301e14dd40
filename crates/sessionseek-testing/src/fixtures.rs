//! Canned corpora shared by integration tests.

use sessionseek_types::Role;

use crate::TestWorld;

/// One session with a single "Hello world" message.
pub fn hello_world() -> TestWorld {
    TestWorld::new()
        .with_project("p1", "Project One")
        .with_session("s1", "p1")
        .with_message("s1", Role::User, "Hello world", "2025-01-01T10:00:00")
}

/// `count` sessions, each holding one tool result that mentions "error".
///
/// Session `sNN` is stamped on day NN, so the newest session has the
/// highest number.
pub fn error_results(count: usize) -> TestWorld {
    let mut world = TestWorld::new().with_project("p1", "Project One");
    for i in 0..count {
        let session_id = format!("s{:02}", i);
        let timestamp = format!("2025-01-{:02}T12:00:00", i + 1);
        world = world
            .with_session(&session_id, "p1")
            .with_message(&session_id, Role::User, "please run the build", &timestamp)
            .with_tool_use(
                &session_id,
                "Bash",
                "cargo build",
                Some("error: build failed"),
                &timestamp,
            );
    }
    world
}

/// Two projects with messages and tool calls across categories.
///
/// - `alpha-1`, `alpha-2` and `alpha-3` in project `alpha`
/// - `beta-1` and `beta-2` in project `beta`
/// - `alpha-2` and `beta-1` share their latest "parser" timestamp
/// - `beta-2` only matches "parser" through a failed tool result
pub fn two_projects() -> TestWorld {
    TestWorld::new()
        .with_project("alpha", "Alpha Service")
        .with_project("beta", "Beta Library")
        .with_session("alpha-1", "alpha")
        .with_session("alpha-2", "alpha")
        .with_session("alpha-3", "alpha")
        .with_session("beta-1", "beta")
        .with_session("beta-2", "beta")
        .with_message(
            "alpha-1",
            Role::User,
            "the parser drops trailing commas",
            "2025-03-01T09:00:00",
        )
        .with_message(
            "alpha-1",
            Role::Assistant,
            "I will fix the parser and add a test",
            "2025-03-01T09:01:00",
        )
        .with_tool_use(
            "alpha-1",
            "Edit",
            "src/parser.rs",
            Some("applied 1 edit"),
            "2025-03-01T09:02:00",
        )
        .with_message(
            "alpha-2",
            Role::User,
            "parser benchmark numbers look off",
            "2025-03-05T14:00:00",
        )
        .with_tool_use(
            "alpha-2",
            "Read",
            "benches/parser.rs",
            Some("fn bench_parse() {}"),
            "2025-03-05T14:00:30",
        )
        .with_message(
            "alpha-3",
            Role::User,
            "update the changelog",
            "2025-03-07T08:00:00",
        )
        .with_message(
            "beta-1",
            Role::User,
            "why does the parser panic on empty input",
            "2025-03-05T14:00:30",
        )
        .with_message(
            "beta-1",
            Role::Assistant,
            "Let me run the tests first",
            "2025-03-05T14:10:00",
        )
        .with_tool_error(
            "beta-2",
            "Bash",
            "cargo test",
            "thread 'parser::tests::empty' panicked",
            "2025-03-06T10:00:00",
        )
}
