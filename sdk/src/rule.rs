//! Eligibility rules deciding which items a bag accepts.
//!
//! Rules are written as short text expressions in catalog files:
//!
//! ```text
//! category:-15 & !(id:386 | id:909) | id:386 & size:large..
//! ```
//!
//! `&` binds tighter than `|`, `!` negates the following term and `*` (or
//! `()`) matches everything.

use crate::{
    item::{ItemDescriptor, ItemId, QualityTier},
    items::ItemInfo,
    size::ContainerSizeTier,
};
use itertools::Itertools;
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    iter,
    str::FromStr,
};
use thiserror::Error;

/// What a rule gets to look at when deciding.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    pub id: &'a ItemId,
    pub crafted: bool,
    pub quality: QualityTier,
    pub size: ContainerSizeTier,
    pub info: Option<&'a ItemInfo>,
}

impl<'a> Probe<'a> {
    pub fn new(
        item: &'a ItemDescriptor,
        size: ContainerSizeTier,
        info: Option<&'a ItemInfo>,
    ) -> Self {
        Self {
            id: &item.id,
            crafted: item.crafted,
            quality: item.quality,
            size,
            info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    IdEquals(String),
    IdPrefix(String),
    IdSuffix(String),
    IdContains(String),
    Category(i32),
    Quality(BTreeSet<QualityTier>),
    Crafted(bool),
    Size {
        min: ContainerSizeTier,
        max: ContainerSizeTier,
    },
    Tag(String),
    Name(String),
}

impl Predicate {
    pub fn is_match(&self, probe: &Probe) -> bool {
        match self {
            Predicate::IdEquals(id) => probe.id.as_str() == id,
            Predicate::IdPrefix(prefix) => probe.id.starts_with(prefix.as_str()),
            Predicate::IdSuffix(suffix) => probe.id.ends_with(suffix.as_str()),
            Predicate::IdContains(part) => probe.id.contains(part.as_str()),
            Predicate::Category(category) => probe.info.is_some_and(|i| i.category == *category),
            Predicate::Quality(qualities) => qualities.contains(&probe.quality),
            Predicate::Crafted(crafted) => probe.crafted == *crafted,
            Predicate::Size { min, max } => *min <= probe.size && probe.size <= *max,
            Predicate::Tag(tag) => probe.info.is_some_and(|i| i.has_tag(tag)),
            Predicate::Name(name) => probe
                .info
                .is_some_and(|i| i.name.eq_ignore_ascii_case(name)),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::IdEquals(id) => write!(f, "id:{id}"),
            Predicate::IdPrefix(prefix) => write!(f, "id^:{prefix}"),
            Predicate::IdSuffix(suffix) => write!(f, "id$:{suffix}"),
            Predicate::IdContains(part) => write!(f, "id~:{part}"),
            Predicate::Category(category) => write!(f, "category:{category}"),
            Predicate::Quality(qualities) => write!(f, "quality:{}", qualities.iter().join(",")),
            Predicate::Crafted(crafted) => write!(f, "crafted:{crafted}"),
            Predicate::Size { min, max } if min == max => write!(f, "size:{min}"),
            Predicate::Size { min, max } => write!(f, "size:{min}..{max}"),
            Predicate::Tag(tag) => write!(f, "tag:{tag}"),
            Predicate::Name(name) => write!(f, "name:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Predicate(Predicate),
    All(Vec<Rule>),
    Any(Vec<Rule>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub negated: bool,
    pub node: Node,
}

impl Rule {
    pub fn predicate(predicate: Predicate) -> Self {
        Self {
            negated: false,
            node: Node::Predicate(predicate),
        }
    }

    pub fn all(rules: Vec<Rule>) -> Self {
        Self {
            negated: false,
            node: Node::All(rules),
        }
    }

    pub fn any(rules: Vec<Rule>) -> Self {
        Self {
            negated: false,
            node: Node::Any(rules),
        }
    }

    pub fn anything() -> Self {
        Self::all(vec![])
    }

    pub fn id(id: &str) -> Self {
        Self::predicate(Predicate::IdEquals(id.to_owned()))
    }

    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Groups with no children match everything, whichever the operator.
    pub fn matches_everything(&self) -> bool {
        !self.negated && matches!(&self.node, Node::All(r) | Node::Any(r) if r.is_empty())
    }

    pub fn is_match(&self, probe: &Probe) -> bool {
        let matched = match &self.node {
            Node::Predicate(p) => p.is_match(probe),
            Node::All(rules) => rules.iter().all(|r| r.is_match(probe)),
            Node::Any(rules) => rules.is_empty() || rules.iter().any(|r| r.is_match(probe)),
        };
        matched != self.negated
    }

    /// Widens the rule so that it also matches any of `more`.
    pub fn extend_any(&mut self, more: Vec<Rule>) {
        if more.is_empty() || self.matches_everything() {
            return;
        }
        match &mut self.node {
            Node::Any(rules) if !self.negated => rules.extend(more),
            _ => {
                let current = std::mem::replace(self, Rule::anything());
                *self = Rule::any(iter::once(current).chain(more).collect_vec());
            }
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        match &self.node {
            Node::Predicate(p) => write!(f, "{p}"),
            Node::All(rules) | Node::Any(rules) if rules.is_empty() => write!(f, "*"),
            Node::All(rules) => write!(f, "({})", rules.iter().join(" & ")),
            Node::Any(rules) => write!(f, "({})", rules.iter().join(" | ")),
        }
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        if parser.peek().is_none() {
            return Err(RuleParseError::Empty);
        }
        let rule = parser.parse_or()?;
        match parser.peek() {
            Some(found) => Err(RuleParseError::Unexpected {
                found,
                position: parser.offset(),
            }),
            None => Ok(rule),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RuleParseError {
    #[error("empty rule")]
    Empty,
    #[error("unexpected '{found}' at {position}")]
    Unexpected { found: char, position: usize },
    #[error("unexpected end of rule")]
    UnexpectedEnd,
    #[error("missing ':' after '{0}'")]
    MissingSeparator(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

struct Parser<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().collect_vec(),
            pos: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|(_, c)| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.get(self.pos).map(|(_, c)| *c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.text.len(), |(i, _)| *i)
    }

    fn parse_or(&mut self) -> Result<Rule, RuleParseError> {
        let mut terms = vec![self.parse_and()?];
        while self.eat('|') {
            terms.push(self.parse_and()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Rule::any(terms)
        })
    }

    fn parse_and(&mut self) -> Result<Rule, RuleParseError> {
        let mut terms = vec![self.parse_unary()?];
        while self.eat('&') {
            terms.push(self.parse_unary()?);
        }
        Ok(if terms.len() == 1 {
            terms.remove(0)
        } else {
            Rule::all(terms)
        })
    }

    fn parse_unary(&mut self) -> Result<Rule, RuleParseError> {
        match self.peek() {
            None => Err(RuleParseError::UnexpectedEnd),
            Some('!') => {
                self.pos += 1;
                Ok(self.parse_unary()?.negate())
            }
            Some('*') => {
                self.pos += 1;
                Ok(Rule::anything())
            }
            Some('(') => {
                self.pos += 1;
                if self.eat(')') {
                    return Ok(Rule::anything());
                }
                let rule = self.parse_or()?;
                if !self.eat(')') {
                    return match self.peek() {
                        Some(found) => Err(RuleParseError::Unexpected {
                            found,
                            position: self.offset(),
                        }),
                        None => Err(RuleParseError::UnexpectedEnd),
                    };
                }
                Ok(rule)
            }
            Some(found @ ('|' | '&' | ')')) => Err(RuleParseError::Unexpected {
                found,
                position: self.offset(),
            }),
            Some(_) => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<Rule, RuleParseError> {
        let start = self.offset();
        while let Some((_, c)) = self.chars.get(self.pos) {
            if matches!(c, ':' | '|' | '&' | '(' | ')') {
                break;
            }
            self.pos += 1;
        }
        let key = self.text[start..self.offset()].trim().to_ascii_lowercase();
        if !self.chars.get(self.pos).is_some_and(|(_, c)| *c == ':') {
            return Err(RuleParseError::MissingSeparator(key));
        }
        self.pos += 1;
        let value_start = self.offset();
        while let Some((_, c)) = self.chars.get(self.pos) {
            if matches!(c, '|' | '&' | ')') {
                break;
            }
            self.pos += 1;
        }
        let value = self.text[value_start..self.offset()].trim();
        parse_predicate(&key, value).map(Rule::predicate)
    }
}

fn parse_predicate(key: &str, value: &str) -> Result<Predicate, RuleParseError> {
    let invalid = || RuleParseError::InvalidValue {
        key: key.to_owned(),
        value: value.to_owned(),
    };
    if value.is_empty() {
        return Err(invalid());
    }
    Ok(match key {
        "id" => Predicate::IdEquals(value.to_owned()),
        "id^" => Predicate::IdPrefix(value.to_owned()),
        "id$" => Predicate::IdSuffix(value.to_owned()),
        "id~" => Predicate::IdContains(value.to_owned()),
        "category" => Predicate::Category(value.parse().map_err(|_| invalid())?),
        "quality" => Predicate::Quality(
            value
                .split(',')
                .map(|q| QualityTier::from_str(q.trim()))
                .collect::<Result<BTreeSet<_>, _>>()
                .map_err(|_| invalid())?,
        ),
        "crafted" => Predicate::Crafted(value.parse().map_err(|_| invalid())?),
        "size" => {
            let (min, max) = match value.split_once("..") {
                Some((min, max)) => (
                    parse_size_bound(min, ContainerSizeTier::Small),
                    parse_size_bound(max, ContainerSizeTier::Massive),
                ),
                None => {
                    let exact = parse_size_bound(value, ContainerSizeTier::Small);
                    (exact, exact)
                }
            };
            let (Some(min), Some(max)) = (min, max) else {
                return Err(invalid());
            };
            if min > max {
                return Err(invalid());
            }
            Predicate::Size { min, max }
        }
        "tag" => Predicate::Tag(value.to_owned()),
        "name" => Predicate::Name(value.to_owned()),
        _ => return Err(RuleParseError::UnknownKey(key.to_owned())),
    })
}

fn parse_size_bound(text: &str, open: ContainerSizeTier) -> Option<ContainerSizeTier> {
    let text = text.trim();
    if text.is_empty() {
        return Some(open);
    }
    ContainerSizeTier::from_str(text).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::{COPPER_ORE, IRIDIUM_ORE, TOPAZ},
        items::Items,
        test_utils::{id, item},
    };

    fn check(rule: &str, item: &ItemDescriptor, size: ContainerSizeTier) -> bool {
        let items = Items::builtin();
        let info = items.info(item);
        rule.parse::<Rule>()
            .unwrap()
            .is_match(&Probe::new(item, size, info.as_deref()))
    }

    #[test]
    fn identity_predicates() {
        let ore = item(COPPER_ORE, 1);
        let small = ContainerSizeTier::Small;
        assert!(check("id:378", &ore, small));
        assert!(!check("id:380", &ore, small));
        assert!(check("id^:37", &ore, small));
        assert!(check("id$:78", &ore, small));
        assert!(check("id~:7", &ore, small));
        assert!(!check("id~:9", &ore, small));
    }

    #[test]
    fn metadata_predicates_use_the_registry() {
        let small = ContainerSizeTier::Small;
        assert!(check("category:-15", &item(COPPER_ORE, 1), small));
        assert!(check("name:copper ore", &item(COPPER_ORE, 1), small));
        assert!(check("tag:gem", &item(TOPAZ, 1), small));
        assert!(!check("tag:gem", &item("Mod.Unknown", 1), small));
        assert!(!check("category:0", &item("Mod.Unknown", 1), small));
    }

    #[test]
    fn quality_crafted_and_size_predicates() {
        let gold = item(COPPER_ORE, 1).with_quality(QualityTier::Gold);
        let small = ContainerSizeTier::Small;
        assert!(check("quality:silver,gold", &gold, small));
        assert!(!check("quality:regular", &gold, small));
        assert!(check("crafted:false", &gold, small));
        assert!(!check("crafted:true", &gold, small));
        assert!(!check("size:large..", &gold, small));
        assert!(check("size:large..", &gold, ContainerSizeTier::Massive));
        assert!(check("size:..medium", &gold, ContainerSizeTier::Medium));
        assert!(check("size:giant", &gold, ContainerSizeTier::Giant));
        assert!(!check("size:giant", &gold, ContainerSizeTier::Massive));
    }

    #[test]
    fn composites_and_precedence() {
        let iridium = item(IRIDIUM_ORE, 1);
        let rule = "category:-15 & !id:386 | id:386 & size:large..";
        assert!(!check(rule, &iridium, ContainerSizeTier::Small));
        assert!(check(rule, &iridium, ContainerSizeTier::Large));
        assert!(check(rule, &item(COPPER_ORE, 1), ContainerSizeTier::Small));
        assert!(check("!(id:1 | id:2)", &iridium, ContainerSizeTier::Small));
        assert!(!check("!!id:1", &iridium, ContainerSizeTier::Small));
    }

    #[test]
    fn empty_groups_match_everything() {
        let ore = item(COPPER_ORE, 1);
        assert!(check("*", &ore, ContainerSizeTier::Small));
        assert!(check("()", &ore, ContainerSizeTier::Small));
        assert!(!check("!*", &ore, ContainerSizeTier::Small));
        let probe = Probe::new(&ore, ContainerSizeTier::Small, None);
        assert!(Rule::any(vec![]).is_match(&probe));
        assert!(Rule::all(vec![]).is_match(&probe));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Rule>(), Err(RuleParseError::Empty));
        assert_eq!(
            "id378".parse::<Rule>(),
            Err(RuleParseError::MissingSeparator("id378".to_owned()))
        );
        assert_eq!(
            "colour:red".parse::<Rule>(),
            Err(RuleParseError::UnknownKey("colour".to_owned()))
        );
        assert!(matches!(
            "category:abc".parse::<Rule>(),
            Err(RuleParseError::InvalidValue { .. })
        ));
        assert!(matches!(
            "size:large..small".parse::<Rule>(),
            Err(RuleParseError::InvalidValue { .. })
        ));
        assert_eq!("(id:1".parse::<Rule>(), Err(RuleParseError::UnexpectedEnd));
        assert_eq!(
            "id:1 )".parse::<Rule>(),
            Err(RuleParseError::Unexpected {
                found: ')',
                position: 5
            })
        );
        assert_eq!("id:1 |".parse::<Rule>(), Err(RuleParseError::UnexpectedEnd));
    }

    #[test]
    fn display_parses_back_to_the_same_rule() {
        let text = "!(id:1 | category:-2 & quality:silver,gold) | size:medium..giant | name:Copper Ore";
        let rule: Rule = text.parse().unwrap();
        assert_eq!(rule.to_string().parse::<Rule>().unwrap(), rule);
    }

    #[test]
    fn extend_any_widens_rules() {
        let ore = item(COPPER_ORE, 1);
        let probe = Probe::new(&ore, ContainerSizeTier::Small, None);
        let mut rule = Rule::id("1");
        assert!(!rule.is_match(&probe));
        rule.extend_any(vec![Rule::id(id(COPPER_ORE).as_str())]);
        assert!(rule.is_match(&probe));
        assert!(matches!(&rule.node, Node::Any(r) if r.len() == 2));
        rule.extend_any(vec![Rule::id("2")]);
        assert!(matches!(&rule.node, Node::Any(r) if r.len() == 3));
    }
}
