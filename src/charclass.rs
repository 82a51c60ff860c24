/*!
  Character classes.

  A `[...]` expression accumulates codepoint ranges, an excluded set, and
  character-property predicates, then folds the lot into an opaque matcher
  function owned by the parsed regex. Class escapes (`\d`, `\w`, `\s`, `\h`
  and their upper-case complements) reference a character property plus a
  small set of additional literal characters.
*/

use crate::character::{to_lower, CharacterProperty, Codepoint};

/// A matcher is a pure predicate over codepoints, referenced by index from
/// AST nodes and, after compilation, from instructions.
pub type CharMatcher = Box<dyn Fn(Codepoint) -> bool + Send + Sync>;

/// An inclusive codepoint range. `min <= max` always holds.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CharRange {
  pub min: Codepoint,
  pub max: Codepoint,
}

/**
  Sorts ranges by their lower bound and merges adjacent or overlapping
  entries, leaving the list pairwise disjoint and strictly increasing so
  that membership can be answered by binary search.
*/
pub fn normalize_ranges(ranges: &mut Vec<CharRange>) {
  if ranges.is_empty() {
    return;
  }

  ranges.sort_by_key(|range| range.min);

  let mut pos = 0;
  for next in 1..ranges.len() {
    let next = ranges[next];
    if ranges[pos].max + 1 >= next.min {
      if next.max > ranges[pos].max {
        ranges[pos].max = next.max;
      }
    } else {
      pos += 1;
      ranges[pos] = next;
    }
  }
  ranges.truncate(pos + 1);
}

// region Escape tables

/// A class escape: the (lower-case) escape letter, the property it consults,
/// and the literal characters it additionally covers.
pub struct ClassEscape {
  pub name             : char,
  pub property         : Option<CharacterProperty>,
  pub additional_chars : &'static str,
}

pub static CLASS_ESCAPES: [ClassEscape; 4] = [
  ClassEscape { name: 'd', property: Some(CharacterProperty::Digit), additional_chars: "" },
  ClassEscape { name: 'w', property: Some(CharacterProperty::Word),  additional_chars: "_" },
  ClassEscape { name: 's', property: Some(CharacterProperty::Space), additional_chars: "" },
  ClassEscape { name: 'h', property: None,                           additional_chars: " \t" },
];

/// Looks up a class escape by letter; the upper-case letter selects the
/// same entry (the caller negates).
pub fn find_class_escape(name: char) -> Option<&'static ClassEscape> {
  let lowered = name.to_ascii_lowercase();
  CLASS_ESCAPES.iter().find(|escape| escape.name == lowered)
}

pub static CONTROL_ESCAPES: [(char, Codepoint); 5] = [
  ('f', 0x0C),
  ('n', '\n' as Codepoint),
  ('r', '\r' as Codepoint),
  ('t', '\t' as Codepoint),
  ('v', 0x0B),
];

pub fn control_escape_value(name: char) -> Option<Codepoint> {
  CONTROL_ESCAPES
    .iter()
    .find(|(escape, _)| *escape == name)
    .map(|(_, value)| *value)
}

// endregion

impl ClassEscape {
  /// Builds the matcher for this escape used as a standalone atom; the
  /// upper-case form complements the predicate.
  pub fn build_matcher(&self, negated: bool) -> CharMatcher {
    let property = self.property;
    let additional = self.additional_chars;
    Box::new(move |cp| {
      let found = property.map_or(false, |p| p.contains(cp))
        || additional.chars().any(|c| c as Codepoint == cp);
      found != negated
    })
  }
}

/**
  Accumulates the contents of a `[...]` expression. `build` folds the
  collected state into a matcher closure, or collapses the degenerate
  single-codepoint case to a plain literal.
*/
#[derive(Default)]
pub struct ClassBuilder {
  pub negative   : bool,
  pub ranges     : Vec<CharRange>,
  pub excluded   : Vec<Codepoint>,
  pub properties : Vec<(CharacterProperty, bool)>, //< (property, positive?)
}

/// What a class expression reduces to.
pub enum BuiltClass {
  /// A class of exactly one codepoint, e.g. `[*]`.
  Singleton(Codepoint),
  Matcher(CharMatcher),
}

impl ClassBuilder {
  pub fn build(mut self, ignore_case: bool) -> BuiltClass {
    if ignore_case {
      for range in &mut self.ranges {
        range.min = to_lower(range.min);
        range.max = to_lower(range.max);
      }
      for cp in &mut self.excluded {
        *cp = to_lower(*cp);
      }
    }

    normalize_ranges(&mut self.ranges);

    // Optimize the relatively common case of using a character class to
    // escape a character, such as [*]
    if self.properties.is_empty()
      && self.excluded.is_empty()
      && !self.negative
      && self.ranges.len() == 1
      && self.ranges[0].min == self.ranges[0].max
    {
      return BuiltClass::Singleton(self.ranges[0].min);
    }

    let ClassBuilder { negative, ranges, excluded, properties } = self;
    BuiltClass::Matcher(Box::new(move |mut cp| {
      if ignore_case {
        cp = to_lower(cp);
      }

      let idx = ranges.partition_point(|range| range.max < cp);
      let found = (idx < ranges.len() && ranges[idx].min <= cp)
        || properties.iter().any(|(property, positive)| property.contains(cp) == *positive)
        || (!excluded.is_empty() && !excluded.contains(&cp));

      found != negative
    }))
  }
}
