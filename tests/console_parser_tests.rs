//! Parser tests for console control lines

use rust_tilt_morse::console::parser::{is_control_line, parse_line};

#[test]
fn test_parse_simple_command() {
    let cmd = parse_line(":help").unwrap();
    assert_eq!(cmd.command, "help");
    assert_eq!(cmd.args[0], None);
}

#[test]
fn test_parse_command_with_one_arg() {
    let cmd = parse_line(":unit 120").unwrap();
    assert_eq!(cmd.command, "unit");
    assert_eq!(cmd.arg(0), Some("120"));
    assert_eq!(cmd.arg(1), None);
}

#[test]
fn test_parse_command_with_two_args() {
    let cmd = parse_line(":help unit extra").unwrap();
    assert_eq!(cmd.command, "help");
    assert_eq!(cmd.arg(0), Some("unit"));
    assert_eq!(cmd.arg(1), Some("extra"));
    assert_eq!(cmd.arg(2), None);
}

#[test]
fn test_parse_extra_args_are_ignored() {
    let cmd = parse_line(":stats a b c d").unwrap();
    assert_eq!(cmd.args, [Some("a"), Some("b")]);
}

#[test]
fn test_parse_trims_whitespace() {
    let cmd = parse_line("   :status   ").unwrap();
    assert_eq!(cmd.command, "status");
    assert_eq!(cmd.arg(0), None);
}

#[test]
fn test_parse_bare_prefix() {
    let cmd = parse_line(":").unwrap();
    assert_eq!(cmd.command, "");
}

#[test]
fn test_payload_lines_are_not_commands() {
    assert!(parse_line("SOS").is_none());
    assert!(parse_line("... --- ...").is_none());
    assert!(parse_line("help").is_none());
    assert!(parse_line("").is_none());
}

#[test]
fn test_is_control_line() {
    assert!(is_control_line(":clear"));
    assert!(is_control_line("  :clear"));
    assert!(!is_control_line("clear"));
    assert!(!is_control_line("a:b"));
}
