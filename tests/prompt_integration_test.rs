//! End-to-end chains driven through the public prompt API with a scripted terminal

use askchain::error::Error;
use askchain::prompt::{ChainState, Prompt, Question, ScriptedTerminal, Validator};
use serde_json::json;
use test_log::test;

#[test]
fn test_retry_budget_renders_prompt_n_plus_one_times() {
    let mut terminal = ScriptedTerminal::new(["1", "2", "3", "4", "5"]);
    let mut prompt = Prompt::new(&mut terminal);
    prompt
        .ask(
            Question::new("Pick:")
                .key("pick")
                .validate_with(|_, _| false)
                .tries(3)
                .message("Never valid"),
        )
        .unwrap();

    let err = prompt.run().unwrap_err();
    assert_eq!(err.to_string(), "Never valid");
    assert_eq!(prompt.state(), ChainState::Failed);
    assert!(!prompt.context().contains_key("pick"));
    drop(prompt);

    assert_eq!(terminal.count("Pick:"), 4);
    assert_eq!(terminal.reads(), 4);
    assert_eq!(terminal.remaining(), 1);
}

#[test]
fn test_boolean_answers() {
    for (input, expected) in
        [("y", true), ("Y", true), ("yes", true), ("YES", true), ("no", false), ("sure", false)]
    {
        let mut prompt = Prompt::new(ScriptedTerminal::new([input]));
        prompt.ask(Question::new("Continue?").key("go").boolean()).unwrap();
        assert_eq!(prompt.run().unwrap().get_bool("go"), Some(expected), "input {input:?}");
    }

    let mut prompt = Prompt::new(ScriptedTerminal::new([""]));
    prompt.ask(Question::new("Continue?").key("go").boolean().default("N")).unwrap();
    assert_eq!(prompt.run().unwrap().get_bool("go"), Some(false));

    let mut prompt = Prompt::new(ScriptedTerminal::new([""]));
    prompt.ask(Question::new("Continue?").key("go").boolean().default("y")).unwrap();
    assert_eq!(prompt.run().unwrap().get_bool("go"), Some(true));
}

#[test]
fn test_integer_answers_truncate_or_reject() {
    let mut prompt = Prompt::new(ScriptedTerminal::new(["abc", "42.9"]));
    prompt.ask(Question::new("Port:").key("port").integer().tries(1)).unwrap();
    assert_eq!(prompt.run().unwrap().get_i64("port"), Some(42));
}

#[test]
fn test_pattern_validator() {
    let mut terminal = ScriptedTerminal::new(["Bob!", "bob"]);
    let mut prompt = Prompt::new(&mut terminal);
    prompt
        .ask(
            Question::new("User:")
                .key("user")
                .validate(Validator::pattern("^[a-z]+$").unwrap())
                .tries(1)
                .message("Lowercase letters only"),
        )
        .unwrap();
    assert_eq!(prompt.run().unwrap().get_str("user"), Some("bob"));
    drop(prompt);
    assert_eq!(terminal.count("Lowercase letters only"), 1);
}

#[test]
fn test_interface_and_subnet_setup() {
    let mut terminal = ScriptedTerminal::new(["wlan0", "eth0", "y", "2001:db8::/48", "n"]);
    let mut prompt = Prompt::new(&mut terminal)
        .with_context([("ifaces", json!(["eth0", "lo"])), ("addrs", json!([]))].into_iter().collect());

    prompt
        .ask(
            Question::new("Which interface?")
                .key("iface")
                .validate(Validator::allow_from("ifaces"))
                .tries(2)
                .message("Unknown interface"),
        )
        .unwrap()
        .then(|scope| {
            let iface = scope.context().get_str("iface").unwrap_or_default().to_string();
            scope.say(&format!("Configuring {iface}"))
        })
        .unwrap()
        .ask(Question::new("Add an IPv6 subnet?").boolean().default("N").if_true(|_, scope| {
            let subnet = scope.ask(
                Question::new("Subnet:")
                    .required(true)
                    .validate_with(|text, _| text.contains('/'))
                    .tries(2),
            )?;
            let mut addrs = scope.context().get("addrs").cloned().unwrap_or_else(|| json!([]));
            if let Some(list) = addrs.as_array_mut() {
                list.push(subnet);
            }
            scope.context_mut().insert("addrs", addrs);
            Ok(())
        }))
        .unwrap()
        .ask_with(|context| {
            let count = context.get("addrs").and_then(|a| a.as_array()).map_or(0, Vec::len);
            Question::new(format!("Keep {count} subnet(s)?")).key("keep").boolean()
        })
        .unwrap();

    let context = prompt.run().unwrap();
    assert_eq!(context.get_str("iface"), Some("eth0"));
    assert_eq!(context.get("addrs"), Some(&json!(["2001:db8::/48"])));
    assert_eq!(context.get_bool("keep"), Some(false));
    assert_eq!(context.history().len(), 4);
    prompt.done();
    drop(prompt);

    assert_eq!(terminal.count("Unknown interface"), 1);
    assert!(terminal.output().contains("Configuring eth0"));
    assert!(terminal.output().contains("Keep 1 subnet(s)?"));
    assert_eq!(terminal.close_count(), 1);
}

#[test]
fn test_interrupt_in_nested_question() {
    let mut terminal = ScriptedTerminal::new(["y"]).with_interrupt();
    let mut prompt = Prompt::new(&mut terminal);
    prompt
        .ask(Question::new("Add?").boolean().if_true(|_, scope| {
            scope.ask(Question::new("Value:").key("value"))?;
            Ok(())
        }))
        .unwrap()
        .ask(Question::new("Later:"))
        .unwrap();

    let err = prompt.run().unwrap_err();
    assert!(matches!(err, Error::Interrupted));
    assert_eq!(err.exit_code(), 130);
    assert_eq!(prompt.state(), ChainState::Interrupted);
    assert!(matches!(prompt.run(), Err(Error::ChainClosed)));
    drop(prompt);

    assert_eq!(terminal.close_count(), 1);
    assert!(!terminal.output().contains("Later:"));
}

#[test]
fn test_failure_message_is_printed_once_per_attempt() {
    let mut terminal = ScriptedTerminal::new(["", ""]);
    let mut prompt = Prompt::new(&mut terminal);
    prompt
        .ask(Question::new("Name:").required(true).tries(1).message("A name is required"))
        .unwrap();

    assert!(matches!(prompt.run(), Err(Error::RequiredMissing(msg)) if msg == "A name is required"));
    drop(prompt);
    assert_eq!(terminal.count("A name is required"), 2);
}
