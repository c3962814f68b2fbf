use guess_client::{validate, validate_ip, validate_port, Command, CommandError, ConnectionState};
use proptest::prelude::*;

use ConnectionState::{Connected, Disconnected};

#[test]
fn ip_shape_only_checks_digit_counts() {
    assert!(validate_ip("192.168.1.1"));
    assert!(validate_ip("999.1.1.1"));
    assert!(validate_ip("0.0.0.0"));
    assert!(!validate_ip("1.2.3"));
    assert!(!validate_ip("1.2.3.4.5"));
    assert!(!validate_ip("1234.1.1.1"));
    assert!(!validate_ip("a.b.c.d"));
    assert!(!validate_ip(" 1.2.3.4"));
    assert!(!validate_ip("localhost"));
}

#[test]
fn ip_rejects_non_ascii_digits() {
    assert!(!validate_ip("١.٢.٣.٤"));
}

#[test]
fn port_bounds() {
    assert!(validate_port("1024"));
    assert!(validate_port("65535"));
    assert!(!validate_port("1023"));
    assert!(!validate_port("65536"));
    assert!(!validate_port("abc"));
    assert!(!validate_port(""));
}

#[test]
fn connect_while_disconnected() {
    assert_eq!(
        validate("CONNECT 127.0.0.1 8080", Disconnected),
        Ok(Command::Connect {
            host: "127.0.0.1".into(),
            port: 8080
        })
    );
}

#[test]
fn connect_while_connected_wins_over_bad_args() {
    for line in ["CONNECT 127.0.0.1 8080", "CONNECT", "CONNECT x y z", "CONNECT 1.2.3 1"] {
        assert_eq!(validate(line, Connected), Err(CommandError::AlreadyConnected), "{line}");
    }
}

#[test]
fn connect_arity_and_argument_diagnostics() {
    assert_eq!(
        validate("CONNECT 127.0.0.1", Disconnected).unwrap_err().to_string(),
        "Not enough arguments in: CONNECT"
    );
    assert_eq!(
        validate("CONNECT 127.0.0.1 8080 extra", Disconnected).unwrap_err().to_string(),
        "Too much arguments in: CONNECT"
    );
    assert_eq!(
        validate("CONNECT 127.0.0 8080", Disconnected).unwrap_err().to_string(),
        "IPv4 format is not correct in: CONNECT"
    );
    assert_eq!(
        validate("CONNECT 127.0.0.1 80", Disconnected).unwrap_err().to_string(),
        "PORT is not correct in: CONNECT"
    );
}

#[test]
fn address_is_checked_before_port() {
    assert_eq!(
        validate("CONNECT nope 1", Disconnected),
        Err(CommandError::InvalidAddress("CONNECT".into()))
    );
}

#[test]
fn game_commands_need_a_connection() {
    for tag in ["START", "FINISH", "GUESS"] {
        let err = validate(tag, Disconnected).unwrap_err();
        assert_eq!(err.to_string(), format!("First you should connect to the server: {tag}"));
        assert!(err.is_state_error());
    }
    assert_eq!(
        validate("DISCONNECT", Disconnected).unwrap_err().to_string(),
        "You are not connected to any server: DISCONNECT"
    );
}

#[test]
fn connected_commands() {
    assert_eq!(validate("START", Connected), Ok(Command::Start));
    assert_eq!(validate("FINISH", Connected), Ok(Command::Finish));
    assert_eq!(validate("DISCONNECT", Connected), Ok(Command::Disconnect));
    assert_eq!(
        validate("GUESS 42", Connected),
        Ok(Command::Guess { token: "42".into() })
    );
}

#[test]
fn connected_arity_diagnostics() {
    assert_eq!(
        validate("START now", Connected),
        Err(CommandError::TooManyArguments("START".into()))
    );
    assert_eq!(
        validate("DISCONNECT now", Connected),
        Err(CommandError::TooManyArguments("DISCONNECT".into()))
    );
    assert_eq!(
        validate("GUESS", Connected),
        Err(CommandError::NotEnoughArguments("GUESS".into()))
    );
    assert_eq!(
        validate("GUESS 1 2", Connected),
        Err(CommandError::TooManyArguments("GUESS".into()))
    );
}

#[test]
fn guess_token_may_not_carry_the_delimiter() {
    let err = validate("GUESS a##b", Connected).unwrap_err();
    assert_eq!(err, CommandError::ReservedDelimiter("a##b".into()));
    assert_eq!(err.to_string(), "GUESS token must not contain \"##\": a##b");
}

#[test]
fn tags_are_case_sensitive() {
    assert_eq!(
        validate("start", Connected).unwrap_err().to_string(),
        "This command is unknown: start"
    );
}

#[test]
fn empty_line_is_an_unknown_command() {
    assert_eq!(validate("", Disconnected), Err(CommandError::Unknown(String::new())));
}

#[test]
fn extra_whitespace_between_tokens_is_ignored() {
    assert_eq!(
        validate("  GUESS \t 7  ", Connected),
        Ok(Command::Guess { token: "7".into() })
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn unknown_tags_are_named(
        tag in "[A-Za-z]{1,12}",
        rest in "( [a-z0-9]{1,4}){0,3}",
        connected in any::<bool>(),
    ) {
        let known = ["CONNECT", "START", "FINISH", "DISCONNECT", "GUESS"];
        prop_assume!(!known.contains(&tag.as_str()));
        let state = if connected { Connected } else { Disconnected };
        let err = validate(&format!("{tag}{rest}"), state).unwrap_err();
        prop_assert_eq!(err.to_string(), format!("This command is unknown: {tag}"));
    }

    #[test]
    fn any_in_range_port_is_accepted(port in 1024u32..=65535) {
        prop_assert!(validate_port(&port.to_string()));
        let line = format!("CONNECT 10.0.0.1 {port}");
        prop_assert_eq!(
            validate(&line, Disconnected),
            Ok(Command::Connect { host: "10.0.0.1".into(), port: port as u16 })
        );
    }

    #[test]
    fn out_of_range_ports_are_rejected(port in prop_oneof![0i64..1024, 65536i64..10_000_000]) {
        prop_assert!(!validate_port(&port.to_string()));
    }

    #[test]
    fn any_digit_quad_is_accepted(
        a in 0u32..1000,
        b in 0u32..1000,
        c in 0u32..1000,
        d in 0u32..1000,
    ) {
        let ip = format!("{a}.{b}.{c}.{d}");
        prop_assert!(validate_ip(&ip));
    }

    #[test]
    fn validation_ignores_the_network(token in "[a-zA-Z0-9]{1,16}") {
        let line = format!("GUESS {token}");
        prop_assert_eq!(validate(&line, Connected), Ok(Command::Guess { token: token.clone() }));
        prop_assert!(validate(&line, Disconnected).unwrap_err().is_state_error());
    }
}
