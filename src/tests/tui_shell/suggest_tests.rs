use super::*;

fn cmd(name: &'static str, aliases: &'static [&'static str]) -> CommandDef {
    CommandDef {
        name,
        aliases,
        usage: name,
        help: "",
    }
}

fn names(defs: &[CommandDef]) -> Vec<&'static str> {
    defs.iter().map(|d| d.name).collect()
}

#[test]
fn exact_beats_prefix_beats_substring() {
    assert_eq!(score_match("add", "add"), 100);
    assert_eq!(score_match("ad", "add"), 49);
    assert_eq!(score_match("dd", "add"), 10);
    assert_eq!(score_match("zz", "add"), 0);
}

#[test]
fn matching_ignores_case() {
    assert_eq!(score_match("ReN", "rename"), 47);
}

#[test]
fn aliases_count_toward_the_score() {
    let defs = [cmd("refresh", &["r"]), cmd("rename", &[])];
    assert_eq!(names(&suggestions("r", &defs)), ["refresh", "rename"]);
}

#[test]
fn ties_keep_definition_order() {
    let defs = [cmd("delete", &[]), cmd("deploy", &[])];
    assert_eq!(names(&suggestions("de", &defs)), ["delete", "deploy"]);
}

#[test]
fn duplicate_names_are_offered_once() {
    let defs = [cmd("open", &[]), cmd("open", &[]), cmd("quit", &[])];
    assert_eq!(names(&suggestions("op", &defs)), ["open"]);
}

#[test]
fn typing_arguments_hides_suggestions() {
    let defs = [cmd("set", &[])];
    assert!(suggestions("set maximumResults", &defs).is_empty());
    assert!(suggestions("   ", &defs).is_empty());
}

#[test]
fn leading_slash_is_ignored() {
    let defs = [cmd("help", &["h", "?"])];
    assert_eq!(names(&suggestions("/he", &defs)), ["help"]);
}
