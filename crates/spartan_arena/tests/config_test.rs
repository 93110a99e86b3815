//! Config loading and validation.

use spartan_arena::{ArenaConfig, LlmProvider, OpponentKind};
use spartan_tictactoe::{Outcome, Side};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = ArenaConfig::default();
    assert_eq!(*config.human_side(), Side::Spartan);
    assert_eq!(*config.opponent().kind(), OpponentKind::Llm);
    assert_eq!(*config.opponent().llm_provider(), LlmProvider::Gemini);
    assert_eq!(config.opponent().llm_model(), "gemini-2.5-flash");
    assert_eq!(config.runtime_settings().think_delay, Duration::from_millis(500));
    assert_eq!(config.runtime_settings().request_timeout, Duration::from_secs(15));
    assert_eq!(config.objectives().len(), 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_uses_defaults() {
    let config = ArenaConfig::from_toml("").unwrap();
    assert_eq!(config.objectives().len(), 3);
    assert_eq!(*config.think_delay_ms(), 500);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
human_side = "persian"
think_delay_ms = 250

[opponent]
kind = "minimax"

[[objectives]]
id = 7
description = "Win 2 Games as Persian"
target = 2
required_side = "persian"
required_outcome = "win"

[[objectives]]
id = 8
description = "Lose Once"
target = 1
required_outcome = "loss"
"#
    )
    .unwrap();

    let config = ArenaConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.human_side(), Side::Persian);
    assert_eq!(*config.opponent().kind(), OpponentKind::Minimax);
    assert_eq!(config.runtime_settings().think_delay, Duration::from_millis(250));

    let tracker = config.tracker();
    let first = tracker.get(7).unwrap();
    assert_eq!(*first.required_side(), Some(Side::Persian));
    assert_eq!(*first.progress(), 0);
    assert_eq!(*tracker.get(8).unwrap().required_outcome(), Some(Outcome::Loss));
}

#[test]
fn test_rejects_zero_target() {
    let err = ArenaConfig::from_toml(
        r#"
[[objectives]]
id = 1
description = "Nothing"
target = 0
"#,
    )
    .unwrap_err();
    assert!(err.message.contains("target 0"));
}

#[test]
fn test_rejects_duplicate_ids() {
    let err = ArenaConfig::from_toml(
        r#"
[[objectives]]
id = 1
description = "One"
target = 1

[[objectives]]
id = 1
description = "Also one"
target = 2
"#,
    )
    .unwrap_err();
    assert!(err.message.contains("Duplicate"));
}

#[test]
fn test_rejects_side_without_win() {
    let err = ArenaConfig::from_toml(
        r#"
[[objectives]]
id = 1
description = "Draw as Spartan"
target = 1
required_side = "spartan"
required_outcome = "draw"
"#,
    )
    .unwrap_err();
    assert!(err.message.contains("requires a side"));
}

#[test]
fn test_rejects_unknown_opponent() {
    assert!(ArenaConfig::from_toml("[opponent]\nkind = \"oracle\"\n").is_err());
}

#[test]
fn test_overrides() {
    let config = ArenaConfig::default()
        .with_human_side(Side::Persian)
        .with_opponent_kind(OpponentKind::FirstEmpty);
    assert_eq!(*config.human_side(), Side::Persian);
    assert_eq!(config.build_provider().unwrap().name(), "first-empty");
}

#[test]
fn test_local_providers_need_no_key() {
    let config = ArenaConfig::default().with_opponent_kind(OpponentKind::Minimax);
    assert_eq!(config.build_provider().unwrap().name(), "minimax");
}
