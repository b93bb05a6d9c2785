// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Procdraw-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Procdraw and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Transcript to command parsing. Purely syntactic: node phrases stay unresolved strings.

use std::sync::OnceLock;

use regex::{Captures, Regex, RegexBuilder};

use crate::model::{EdgeType, Position};
use crate::schema::{Direction, RelativeSide};

/// Upper bound for counted additions such as "add three pumps".
const MAX_REPEAT: usize = 10;

/// Words that can open a command. Commas and "and" only split a transcript in front of these.
const COMMAND_VERBS: &[&str] = &[
    "add", "insert", "place", "create", "put", "draw", "make", "connect", "link", "join", "wire",
    "hook", "remove", "delete", "erase", "disconnect", "rename", "relabel", "change", "set",
    "move", "shift", "nudge", "drag", "push", "position", "select", "highlight", "deselect",
    "unselect", "clear", "wipe", "reset", "describe", "show", "list",
];

const LEAD_FILLERS: &[&str] = &["and", "then", "also", "please", "now", "next", "finally"];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Motion {
    Absolute(Position),
    Nudge { direction: Direction, offset: Option<f64> },
    Beside { side: RelativeSide, reference: String, offset: Option<f64> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Add { kind: String, label: Option<String>, placement: Option<(RelativeSide, String)> },
    Connect { from: String, to: String, edge_type: Option<EdgeType>, label: Option<String> },
    RemoveNode { target: String },
    RemoveEdge { from: String, to: String },
    Rename { target: String, label: String },
    Move { target: String, motion: Motion },
    Select { targets: Vec<String>, extend: bool },
    SelectAll,
    Deselect,
    Clear,
    Describe,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParsedTranscript {
    pub(crate) commands: Vec<Command>,
    pub(crate) unrecognized: Vec<String>,
}

struct Patterns {
    then_split: Regex,
    and_split: Regex,
    filler: Regex,
    clear: Regex,
    describe: Regex,
    deselect: Regex,
    select: Regex,
    draw_edge: Regex,
    connect: Regex,
    remove_edge: Regex,
    disconnect: Regex,
    remove_node: Regex,
    rename: Regex,
    set_label: Regex,
    move_to: Regex,
    move_beside: Regex,
    move_direction: Regex,
    add: Regex,
    list_split: Regex,
    count: Regex,
}

const EDGE_NOUN: &str = r"(?:line|edge|connection|link|stream|pipe|wire|arrow)";
const LABEL_TAIL: &str = r"(?:\s+(?:called|named|labeled|labelled|with\s+(?:the\s+)?label)\s+(?P<label>.+))?";
const SIDE: &str = r"(?P<side>left\s+of|right\s+of|above|below|underneath|under|beneath|over|on\s+top\s+of|next\s+to|beside|after|before)";
const NUMBER: &str = r"-?\d+(?:\.\d+)?";
const UNIT: &str = r"(?:\s*(?:px|pixels?|units?|points?))?";

impl Patterns {
    fn compile() -> Self {
        Self {
            then_split: pattern(r"(?:^|\s+)(?:and\s+)?then\s+"),
            and_split: pattern(r"\s+and\s+"),
            filler: pattern(
                r"^(?:(?:please|ok(?:ay)?|so|now|next|finally|and|then|just|um+|uh+|hey|can\s+you|could\s+you|would\s+you|will\s+you|i\s+(?:want|need|would\s+like)(?:\s+you)?\s+to|let's|lets|go\s+ahead\s+and)\s+)+",
            ),
            clear: pattern(
                r"^(?:(?:clear|wipe|reset|erase|empty)(?:\s+out)?\s+(?:the\s+)?(?:whole\s+|entire\s+)?(?:canvas|diagram|drawing|board|sheet|page)|(?:clear|delete|remove|erase)\s+(?:everything|all\s+nodes|all)|start\s+(?:over|fresh|from\s+scratch))$",
            ),
            describe: pattern(
                r"^(?:what(?:'s|\s+is)\s+(?:on|in)\s+the\s+(?:canvas|diagram|drawing)|describe\s+(?:the\s+)?(?:canvas|diagram|drawing|state|current\s+state)|(?:show|tell)\s+(?:me\s+)?(?:the\s+)?(?:current\s+)?(?:state|diagram|canvas)|how\s+many\s+.+|list\s+(?:all\s+)?(?:the\s+)?(?:nodes|elements|equipment|items))$",
            ),
            deselect: pattern(
                r"^(?:(?:deselect|unselect)(?:\s+(?:all|everything))?|clear\s+(?:the\s+)?selection|select\s+nothing)$",
            ),
            select: pattern(r"^(?:select|highlight)\s+(?P<targets>.+?)(?P<too>\s+(?:too|as\s+well))?$"),
            draw_edge: pattern(&format!(
                r"^(?:draw|add|create|make|insert)\s+(?:an?\s+|the\s+)?(?:(?P<kind>\w+)\s+)?{EDGE_NOUN}\s+(?:from|between)\s+(?P<from>.+?)\s+(?:to|and|into)\s+(?P<to>.+?){LABEL_TAIL}$"
            )),
            connect: pattern(&format!(
                r"^(?:connect|link|join|wire(?:\s+up)?|hook\s+up)\s+(?P<from>.+?)\s+(?:to|with|and|into)\s+(?P<to>.+?)(?:\s+(?:with|using|via|as|by)\s+(?:an?\s+)?(?P<kind>\w+)\s+{EDGE_NOUN})?{LABEL_TAIL}$"
            )),
            remove_edge: pattern(&format!(
                r"^(?:remove|delete|erase|cut)\s+(?:the\s+)?(?:\w+\s+)?{EDGE_NOUN}\s+(?:from|between)\s+(?P<from>.+?)\s+(?:to|and)\s+(?P<to>.+)$"
            )),
            disconnect: pattern(r"^disconnect\s+(?P<from>.+?)\s+(?:from|and)\s+(?P<to>.+)$"),
            remove_node: pattern(r"^(?:remove|delete|erase|get\s+rid\s+of)\s+(?P<target>.+)$"),
            rename: pattern(r"^(?:rename|relabel)\s+(?P<target>.+?)\s+(?:to|as)\s+(?P<label>.+)$"),
            set_label: pattern(
                r"^(?:change|set)\s+(?:the\s+)?(?:label|name)\s+(?:of|on|for)\s+(?P<target>.+?)\s+to\s+(?P<label>.+)$",
            ),
            move_to: pattern(&format!(
                r"^(?P<verb>move|place|put|drag|position)\s+(?P<target>.+?)\s+(?:to|at)\s+(?:position\s+|coordinates?\s+)?\(?\s*(?:x\s*=?\s*)?(?P<x>{NUMBER})\s*(?:,\s*|\s+)(?:y\s*=?\s*)?(?P<y>{NUMBER})\s*\)?$"
            )),
            move_beside: pattern(&format!(
                r"^(?P<verb>move|place|put|drag|position)\s+(?P<target>.+?)\s+(?:(?P<offset>{NUMBER}){UNIT}\s+)?(?:to\s+the\s+)?{SIDE}\s+(?P<reference>.+)$"
            )),
            move_direction: pattern(&format!(
                r"^(?:move|shift|nudge|drag|push)\s+(?P<target>.+?)\s+(?:(?:by\s+)?(?P<pre>{NUMBER}){UNIT}\s+)?(?:to\s+the\s+)?(?P<direction>left|right|up|down|upwards?|downwards?)(?:\s+(?:by\s+)?(?P<post>{NUMBER}){UNIT})?$"
            )),
            add: pattern(&format!(
                r"^(?:add|insert|place|create|put|draw|make)\s+(?P<what>.+?)(?:\s+(?:to\s+the\s+)?{SIDE}\s+(?P<reference>.+?))?{LABEL_TAIL}$"
            )),
            list_split: pattern(r"\s*,\s*(?:and\s+)?|\s+and\s+"),
            count: pattern(
                r"^(?P<count>\d+|a|an|one|another|two|three|four|five|six|seven|eight|nine|ten)\s+(?P<rest>.+)$",
            ),
        }
    }
}

fn pattern(source: &str) -> Regex {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .expect("built-in command pattern compiles")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::compile)
}

pub(crate) fn parse_transcript(transcript: &str) -> ParsedTranscript {
    let mut parsed = ParsedTranscript::default();
    for clause in split_clauses(transcript) {
        match parse_clause(&clause) {
            Some(commands) => parsed.commands.extend(commands),
            None => parsed.unrecognized.push(clause),
        }
    }
    parsed
}

/// Splits on sentence punctuation and `then`, and on commas or `and` that open a new command.
pub(crate) fn split_clauses(transcript: &str) -> Vec<String> {
    let p = patterns();
    let mut clauses = Vec::new();
    for sentence in split_sentences(transcript) {
        for part in p.then_split.split(&sentence) {
            let mut start = 0;
            for found in p.and_split.find_iter(part) {
                if found.start() >= start && starts_command(&part[found.end()..]) {
                    push_clause(&mut clauses, &part[start..found.start()]);
                    start = found.end();
                }
            }
            push_clause(&mut clauses, &part[start..]);
        }
    }
    clauses
}

fn split_sentences(transcript: &str) -> Vec<String> {
    let chars = transcript.chars().collect::<Vec<_>>();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        let boundary = match ch {
            ';' | '!' | '?' | '\n' => true,
            '.' => {
                let prev_digit = index > 0 && chars[index - 1].is_ascii_digit();
                let next_digit = chars.get(index + 1).is_some_and(|c| c.is_ascii_digit());
                !(prev_digit && next_digit)
            }
            ',' => {
                let rest = chars[index + 1..].iter().collect::<String>();
                starts_command(&rest)
            }
            _ => false,
        };
        if boundary {
            sentences.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    sentences.push(current);
    sentences
}

/// True when `text` begins with a command verb, ignoring connective fillers.
fn starts_command(text: &str) -> bool {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_ascii_lowercase())
        .find(|word| !LEAD_FILLERS.contains(&word.as_str()))
        .is_some_and(|word| COMMAND_VERBS.contains(&word.as_str()))
}

fn push_clause(clauses: &mut Vec<String>, raw: &str) {
    let clause = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '.' | ',' | ':' | '"' | '\''))
        .trim();
    if !clause.is_empty() {
        clauses.push(clause.to_owned());
    }
}

fn strip_fillers(clause: &str) -> &str {
    let clause = clause.trim();
    let clause = match patterns().filler.find(clause) {
        Some(found) => &clause[found.end()..],
        None => clause,
    };
    let clause = clause.strip_suffix(" please").unwrap_or(clause);
    clause.trim()
}

pub(crate) fn parse_clause(clause: &str) -> Option<Vec<Command>> {
    let p = patterns();
    let mut clause = strip_fillers(clause);
    let mut also = false;
    if let Some(rest) = strip_word(clause, "also") {
        also = true;
        clause = strip_fillers(rest);
    }
    if clause.is_empty() {
        return None;
    }

    if p.clear.is_match(clause) {
        return Some(vec![Command::Clear]);
    }
    if p.describe.is_match(clause) {
        return Some(vec![Command::Describe]);
    }
    if p.deselect.is_match(clause) {
        return Some(vec![Command::Deselect]);
    }
    if let Some(caps) = p.select.captures(clause) {
        let targets = split_list(group(&caps, "targets"));
        if targets.len() == 1 && matches!(targets[0].to_ascii_lowercase().as_str(), "all" | "everything") {
            return Some(vec![Command::SelectAll]);
        }
        let extend = also || caps.name("too").is_some();
        return Some(vec![Command::Select { targets, extend }]);
    }
    if let Some(caps) = p.draw_edge.captures(clause).or_else(|| p.connect.captures(clause)) {
        return Some(vec![Command::Connect {
            from: group(&caps, "from").to_owned(),
            to: group(&caps, "to").to_owned(),
            edge_type: caps.name("kind").and_then(|kind| edge_type_word(kind.as_str())),
            label: optional(&caps, "label").map(clean_label),
        }]);
    }
    if let Some(caps) = p.remove_edge.captures(clause).or_else(|| p.disconnect.captures(clause)) {
        return Some(vec![Command::RemoveEdge {
            from: group(&caps, "from").to_owned(),
            to: group(&caps, "to").to_owned(),
        }]);
    }
    if let Some(caps) = p.remove_node.captures(clause) {
        return Some(
            split_list(group(&caps, "target"))
                .into_iter()
                .map(|target| Command::RemoveNode { target })
                .collect(),
        );
    }
    if let Some(caps) = p.rename.captures(clause).or_else(|| p.set_label.captures(clause)) {
        return Some(vec![Command::Rename {
            target: group(&caps, "target").to_owned(),
            label: clean_label(group(&caps, "label")),
        }]);
    }
    if let Some(command) = parse_move(clause) {
        return Some(vec![command]);
    }
    if let Some(caps) = p.add.captures(clause) {
        return parse_add(&caps);
    }
    None
}

fn parse_move(clause: &str) -> Option<Command> {
    let p = patterns();
    if let Some(caps) = p.move_to.captures(clause) {
        let target = group(&caps, "target");
        if !adds_node(group(&caps, "verb"), target) {
            let x = group(&caps, "x").parse().ok()?;
            let y = group(&caps, "y").parse().ok()?;
            return Some(Command::Move {
                target: target.to_owned(),
                motion: Motion::Absolute(Position::new(x, y)),
            });
        }
    }
    if let Some(caps) = p.move_beside.captures(clause) {
        let target = group(&caps, "target");
        if !adds_node(group(&caps, "verb"), target) {
            return Some(Command::Move {
                target: target.to_owned(),
                motion: Motion::Beside {
                    side: side_word(group(&caps, "side")),
                    reference: group(&caps, "reference").to_owned(),
                    offset: optional(&caps, "offset").and_then(|raw| raw.parse().ok()),
                },
            });
        }
    }
    if let Some(caps) = p.move_direction.captures(clause) {
        let offset = optional(&caps, "pre")
            .or_else(|| optional(&caps, "post"))
            .and_then(|raw| raw.parse().ok());
        return Some(Command::Move {
            target: group(&caps, "target").to_owned(),
            motion: Motion::Nudge { direction: direction_word(group(&caps, "direction")), offset },
        });
    }
    None
}

fn parse_add(caps: &Captures<'_>) -> Option<Vec<Command>> {
    let label = optional(caps, "label").map(clean_label);
    let placement = optional(caps, "reference")
        .map(|reference| (side_word(group(caps, "side")), reference.to_owned()));

    let mut commands = Vec::new();
    for item in split_list(group(caps, "what")) {
        let (count, kind) = split_count(&item);
        for _ in 0..count {
            if commands.len() == MAX_REPEAT {
                break;
            }
            commands.push(Command::Add {
                kind: kind.clone(),
                label: label.clone(),
                placement: placement.clone(),
            });
        }
    }
    (!commands.is_empty()).then_some(commands)
}

fn split_count(item: &str) -> (usize, String) {
    let Some(caps) = patterns().count.captures(item) else {
        return (1, item.to_owned());
    };
    let count = match group(&caps, "count").to_ascii_lowercase().as_str() {
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse::<usize>().unwrap_or(1),
    };
    (count.clamp(1, MAX_REPEAT), group(&caps, "rest").to_owned())
}

fn split_list(raw: &str) -> Vec<String> {
    patterns()
        .list_split
        .split(raw)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// "place a valve left of the tank" adds a node; "place the valve ..." moves one. Other verbs
/// always move, so "move A left of B" keeps a node labelled "A".
fn adds_node(verb: &str, target: &str) -> bool {
    if !(verb.eq_ignore_ascii_case("place") || verb.eq_ignore_ascii_case("put")) {
        return false;
    }
    let first = target.split_whitespace().next().unwrap_or_default().to_ascii_lowercase();
    matches!(first.as_str(), "a" | "an" | "another" | "new" | "one")
        || (!first.is_empty() && first.chars().all(|c| c.is_ascii_digit()))
}

fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let head = text.get(..word.len())?;
    let rest = &text[word.len()..];
    (head.eq_ignore_ascii_case(word) && rest.starts_with(char::is_whitespace)).then_some(rest)
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str().trim())
}

fn optional<'t>(caps: &Captures<'t>, name: &str) -> Option<&'t str> {
    caps.name(name).map(|m| m.as_str().trim()).filter(|value| !value.is_empty())
}

fn clean_label(raw: &str) -> String {
    raw.trim().trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”')).trim().to_owned()
}

fn side_word(raw: &str) -> RelativeSide {
    let words = raw.to_ascii_lowercase();
    if words.starts_with("left") || words == "before" {
        RelativeSide::Left
    } else if words.starts_with("above") || words.starts_with("over") || words.starts_with("on") {
        RelativeSide::Above
    } else if words.starts_with("below") || words.starts_with("under") || words == "beneath" {
        RelativeSide::Below
    } else {
        RelativeSide::Right
    }
}

fn direction_word(raw: &str) -> Direction {
    match raw.to_ascii_lowercase().as_str() {
        "left" => Direction::Left,
        "right" => Direction::Right,
        "up" | "upward" | "upwards" => Direction::Up,
        _ => Direction::Down,
    }
}

/// Maps the adjective in "a signal line" or "with a steam line" to an edge type.
pub(crate) fn edge_type_word(word: &str) -> Option<EdgeType> {
    match word.to_ascii_lowercase().as_str() {
        "material" | "process" | "product" | "feed" | "flow" | "solid" => Some(EdgeType::Material),
        "energy" | "heat" | "power" | "electric" | "electrical" => Some(EdgeType::Energy),
        "utility" | "steam" | "water" | "air" | "nitrogen" | "cooling" => Some(EdgeType::Utility),
        "signal" | "control" | "instrument" | "instrumentation" | "data" | "dashed" => {
            Some(EdgeType::Signal)
        }
        other => other.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_clause, parse_transcript, split_clauses, Command, Motion};
    use crate::model::{EdgeType, Position};
    use crate::schema::{Direction, RelativeSide};

    #[rstest]
    #[case("Add a pump.", &["Add a pump"])]
    #[case("add a pump then connect it to the tank", &["add a pump", "connect it to the tank"])]
    #[case("add a pump and connect it to the tank", &["add a pump", "connect it to the tank"])]
    #[case("connect the pump and the tank", &["connect the pump and the tank"])]
    #[case("add a pump, a tank and a valve", &["add a pump, a tank and a valve"])]
    #[case("add a pump, then move it left; select it", &["add a pump", "move it left", "select it"])]
    #[case("move the pump to 120.5, 300", &["move the pump to 120.5, 300"])]
    #[case("add a mixer, and remove the filter", &["add a mixer", "remove the filter"])]
    fn splits_transcripts_into_clauses(#[case] transcript: &str, #[case] expected: &[&str]) {
        assert_eq!(split_clauses(transcript), expected);
    }

    #[test]
    fn add_with_label_and_placement() {
        let commands =
            parse_clause("please add a control valve left of the tank called FV-101").expect("add");
        assert_eq!(
            commands,
            vec![Command::Add {
                kind: "control valve".to_owned(),
                label: Some("FV-101".to_owned()),
                placement: Some((RelativeSide::Left, "the tank".to_owned())),
            }]
        );
    }

    #[test]
    fn add_expands_lists_and_counts() {
        let commands = parse_clause("add two pumps and a tank").expect("add");
        let kinds = commands
            .iter()
            .map(|command| match command {
                Command::Add { kind, .. } => kind.as_str(),
                other => panic!("unexpected {other:?}"),
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["pumps", "pumps", "tank"]);
    }

    #[rstest]
    #[case("connect the pump to the tank", None)]
    #[case("connect the controller to the valve with a signal line", Some(EdgeType::Signal))]
    #[case("draw a steam line from the boiler to the reactor", Some(EdgeType::Utility))]
    #[case("draw a line between the pump and the tank", None)]
    fn connect_variants(#[case] clause: &str, #[case] edge_type: Option<EdgeType>) {
        let commands = parse_clause(clause).expect("connect");
        assert!(matches!(
            commands.as_slice(),
            [Command::Connect { edge_type: parsed, .. }] if *parsed == edge_type
        ));
    }

    #[test]
    fn connect_keeps_endpoints_and_label() {
        let commands = parse_clause("link the feed pump to hx-1 labeled \"hot feed\"").expect("connect");
        assert_eq!(
            commands,
            vec![Command::Connect {
                from: "the feed pump".to_owned(),
                to: "hx-1".to_owned(),
                edge_type: None,
                label: Some("hot feed".to_owned()),
            }]
        );
    }

    #[rstest]
    #[case("move the pump left", Motion::Nudge { direction: Direction::Left, offset: None })]
    #[case("move the pump 50 px up", Motion::Nudge { direction: Direction::Up, offset: Some(50.0) })]
    #[case("shift it down by 20", Motion::Nudge { direction: Direction::Down, offset: Some(20.0) })]
    #[case("move the pump to (100, 250)", Motion::Absolute(Position::new(100.0, 250.0)))]
    #[case(
        "move the pump to the left of the tank",
        Motion::Beside { side: RelativeSide::Left, reference: "the tank".to_owned(), offset: None }
    )]
    #[case(
        "put the filter below the reactor",
        Motion::Beside { side: RelativeSide::Below, reference: "the reactor".to_owned(), offset: None }
    )]
    fn move_variants(#[case] clause: &str, #[case] expected: Motion) {
        let commands = parse_clause(clause).expect("move");
        let [Command::Move { motion, .. }] = commands.as_slice() else {
            panic!("expected a single move, got {commands:?}");
        };
        assert_eq!(motion, &expected);
    }

    #[rstest]
    #[case("move A to the left of B", "A")]
    #[case("move one right of two", "one")]
    #[case("drag 3 to 100, 200", "3")]
    fn move_verbs_keep_article_like_labels(#[case] clause: &str, #[case] expected: &str) {
        let commands = parse_clause(clause).expect("move");
        let [Command::Move { target, .. }] = commands.as_slice() else {
            panic!("expected a single move, got {commands:?}");
        };
        assert_eq!(target, expected);
    }

    #[test]
    fn place_with_indefinite_article_adds_instead_of_moving() {
        let commands = parse_clause("place a valve right of the pump").expect("add");
        assert!(matches!(
            commands.as_slice(),
            [Command::Add { placement: Some((RelativeSide::Right, _)), .. }]
        ));
    }

    #[rstest]
    #[case("clear the canvas", Command::Clear)]
    #[case("start over", Command::Clear)]
    #[case("what's on the canvas", Command::Describe)]
    #[case("deselect everything", Command::Deselect)]
    #[case("select all", Command::SelectAll)]
    fn fixed_phrases(#[case] clause: &str, #[case] expected: Command) {
        assert_eq!(parse_clause(clause), Some(vec![expected]));
    }

    #[test]
    fn select_extends_with_also_or_too() {
        assert_eq!(
            parse_clause("also select the pump and the tank"),
            Some(vec![Command::Select {
                targets: vec!["the pump".to_owned(), "the tank".to_owned()],
                extend: true,
            }])
        );
        assert_eq!(
            parse_clause("select the reactor"),
            Some(vec![Command::Select { targets: vec!["the reactor".to_owned()], extend: false }])
        );
    }

    #[test]
    fn removal_prefers_edges_when_endpoints_are_named() {
        assert_eq!(
            parse_clause("delete the connection between the pump and the tank"),
            Some(vec![Command::RemoveEdge { from: "the pump".to_owned(), to: "the tank".to_owned() }])
        );
        assert_eq!(
            parse_clause("remove the filter"),
            Some(vec![Command::RemoveNode { target: "the filter".to_owned() }])
        );
    }

    #[test]
    fn rename_variants() {
        let expected = Some(vec![Command::Rename {
            target: "the pump".to_owned(),
            label: "P-101".to_owned(),
        }]);
        assert_eq!(parse_clause("rename the pump to P-101"), expected);
        assert_eq!(parse_clause("change the label of the pump to 'P-101'"), expected);
    }

    #[test]
    fn unknown_clauses_are_reported() {
        let parsed = parse_transcript("add a tank. sing a song");
        assert_eq!(parsed.commands.len(), 1);
        assert_eq!(parsed.unrecognized, ["sing a song"]);
    }
}
