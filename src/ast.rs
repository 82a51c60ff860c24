/*!
  The flat parsed form of a pattern.

  Every construct becomes one `AstNode` in a contiguous vector addressed by
  16-bit indices. A node's children are the sub-sequence `[index + 1,
  children_end)`, interpreted recursively by hopping from child to child
  along their own `children_end` pointers; there are no heap links.
*/

use crate::character::Codepoint;
use crate::charclass::CharMatcher;

/// Index of a node within `ParsedRegex::nodes`.
pub type NodeIndex = u16;

/// Capture sentinel for non-capturing alternation nodes.
pub const CAPTURE_NONE: Codepoint = u32::MAX;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Op {
  Literal,
  AnyChar,
  Matcher,
  Sequence,
  Alternation,
  LineStart,
  LineEnd,
  WordBoundary,
  NotWordBoundary,
  SubjectBegin,
  SubjectEnd,
  ResetStart,
  LookAhead,
  NegativeLookAhead,
  LookBehind,
  NegativeLookBehind,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum QuantifierKind {
  One,
  Optional,
  RepeatZeroOrMore,
  RepeatOneOrMore,
  RepeatMinMax,
}

/// How often a node repeats. Bounds of -1 mean unset (min) or unbounded (max).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Quantifier {
  pub kind   : QuantifierKind,
  pub greedy : bool,
  pub min    : i32,
  pub max    : i32,
}

impl Default for Quantifier {
  fn default() -> Self {
    Quantifier { kind: QuantifierKind::One, greedy: true, min: -1, max: -1 }
  }
}

impl Quantifier {
  pub fn new(kind: QuantifierKind, greedy: bool) -> Self {
    Quantifier { kind, greedy, ..Quantifier::default() }
  }

  pub fn allows_none(&self) -> bool {
    self.kind == QuantifierKind::Optional
      || self.kind == QuantifierKind::RepeatZeroOrMore
      || (self.kind == QuantifierKind::RepeatMinMax && self.min <= 0)
  }

  pub fn allows_infinite_repeat(&self) -> bool {
    self.kind == QuantifierKind::RepeatZeroOrMore
      || self.kind == QuantifierKind::RepeatOneOrMore
      || (self.kind == QuantifierKind::RepeatMinMax && self.max == -1)
  }
}

/**
  One parsed construct. `value` is operator-dependent: the codepoint of a
  `Literal`, the matcher-table index of a `Matcher`, or the capture index of
  an `Alternation` (`CAPTURE_NONE` for non-capturing groups).
*/
#[derive(Copy, Clone, Debug)]
pub struct AstNode {
  pub op           : Op,
  pub ignore_case  : bool,      //< Ambient `(?i)` flag at construction time
  pub children_end : NodeIndex, //< Exclusive end of this node's child range
  pub value        : Codepoint,
  pub quantifier   : Quantifier,
}

/// A parsed pattern: the node vector plus everything the nodes reference.
pub struct ParsedRegex {
  pub nodes         : Vec<AstNode>,
  pub capture_count : u32,
  pub matchers      : Vec<CharMatcher>,
}

impl std::fmt::Debug for ParsedRegex {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ParsedRegex")
      .field("nodes", &self.nodes)
      .field("capture_count", &self.capture_count)
      .field("matchers", &format_args!("[{} matchers]", self.matchers.len()))
      .finish()
  }
}

impl ParsedRegex {
  /**
    Calls `func` on each direct child of `index` in order. `func` returns
    whether to keep iterating; the final return value is true if every child
    was visited without an early stop.
  */
  pub fn for_each_child<F>(&self, index: NodeIndex, mut func: F) -> bool
  where F: FnMut(NodeIndex) -> bool {
    let end = self.nodes[index as usize].children_end;
    let mut child = index + 1;
    while child != end {
      if !func(child) {
        return false;
      }
      child = self.nodes[child as usize].children_end;
    }
    true
  }

  /**
    Like `for_each_child`, but visits children in reverse order. End pointers
    only encode forward links, so each step re-scans from the first child to
    find the last one before the current end.
  */
  pub fn for_each_child_reverse<F>(&self, index: NodeIndex, mut func: F) -> bool
  where F: FnMut(NodeIndex) -> bool {
    let find_last_child = |mut begin: NodeIndex, end: NodeIndex| {
      while self.nodes[begin as usize].children_end != end {
        begin = self.nodes[begin as usize].children_end;
      }
      begin
    };

    let first_child = index + 1;
    let mut end = self.nodes[index as usize].children_end;
    while end != first_child {
      let child = find_last_child(first_child, end);
      if !func(child) {
        return false;
      }
      end = child;
    }
    true
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  fn node(op: Op, children_end: NodeIndex) -> AstNode {
    AstNode {
      op,
      ignore_case: false,
      children_end,
      value: CAPTURE_NONE,
      quantifier: Quantifier::default(),
    }
  }

  // (a(bc))d laid out flat: 0 holds 1..5, 1 holds 2..4.
  fn sample() -> ParsedRegex {
    ParsedRegex {
      nodes: vec![
        node(Op::Sequence, 5),
        node(Op::Sequence, 4),
        node(Op::Literal, 3),
        node(Op::Literal, 4),
        node(Op::Literal, 5),
      ],
      capture_count: 1,
      matchers: Vec::new(),
    }
  }

  #[test]
  fn child_walk() {
    let parsed = sample();
    let mut seen = Vec::new();
    assert!(parsed.for_each_child(0, |child| {
      seen.push(child);
      true
    }));
    assert_eq!(seen, vec![1, 4]);

    seen.clear();
    assert!(parsed.for_each_child(1, |child| {
      seen.push(child);
      true
    }));
    assert_eq!(seen, vec![2, 3]);
  }

  #[test]
  fn child_walk_reverse() {
    let parsed = sample();
    let mut seen = Vec::new();
    assert!(parsed.for_each_child_reverse(0, |child| {
      seen.push(child);
      true
    }));
    assert_eq!(seen, vec![4, 1]);
  }

  #[test]
  fn child_walk_stops_early() {
    let parsed = sample();
    let mut seen = Vec::new();
    assert!(!parsed.for_each_child(0, |child| {
      seen.push(child);
      false
    }));
    assert_eq!(seen, vec![1]);
  }

  #[test]
  fn quantifier_predicates() {
    let star = Quantifier::new(QuantifierKind::RepeatZeroOrMore, true);
    assert!(star.allows_none());
    assert!(star.allows_infinite_repeat());

    let plus = Quantifier::new(QuantifierKind::RepeatOneOrMore, true);
    assert!(!plus.allows_none());
    assert!(plus.allows_infinite_repeat());

    let bounded = Quantifier { kind: QuantifierKind::RepeatMinMax, greedy: true, min: 0, max: 3 };
    assert!(bounded.allows_none());
    assert!(!bounded.allows_infinite_repeat());

    let open = Quantifier { kind: QuantifierKind::RepeatMinMax, greedy: false, min: 2, max: -1 };
    assert!(!open.allows_none());
    assert!(open.allows_infinite_repeat());
  }
}
