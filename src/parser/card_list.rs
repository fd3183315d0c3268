//! Revealed-card bullet lists
//!
//! Parses lines like `   • Nest Ball, Dreepy, Basic Psychic Energy` that follow a
//! multi-card draw.

use crate::parser::PatternLibrary;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::map,
    multi::separated_list1,
    sequence::preceded,
    IResult,
};

fn bullet(input: &str) -> IResult<&str, char> {
    preceded(space0, alt((char('•'), char('·'))))(input)
}

fn card_name(input: &str) -> IResult<&str, &str> {
    map(take_while1(|c: char| c != ','), str::trim)(input)
}

fn card_list(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(bullet, preceded(space0, separated_list1(char(','), card_name)))(input)
}

/// Card names listed on a bullet line, or `None` if the line is not a bullet list
pub fn parse_bullet_cards(line: &str) -> Option<Vec<String>> {
    let (_, names) = card_list(line).ok()?;
    let names: Vec<String> = names
        .into_iter()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();
    (!names.is_empty()).then_some(names)
}

/// Cards revealed in the bullet lines after `lines[index]`
///
/// Scans at most `window` following lines, stepping over skip lines, and stops at
/// the first line that is neither a bullet nor noise.
pub fn revealed_after(
    patterns: &PatternLibrary,
    lines: &[&str],
    index: usize,
    window: usize,
) -> Option<Vec<String>> {
    let mut names = Vec::new();
    for line in lines.iter().skip(index + 1).take(window) {
        if patterns.is_bullet(line) {
            if let Some(cards) = parse_bullet_cards(line) {
                names.extend(cards);
            }
        } else if !patterns.is_skip(line) {
            break;
        }
    }
    (!names.is_empty()).then_some(names)
}
