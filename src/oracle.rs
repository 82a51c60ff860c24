/*!
  The start-character oracle.

  A pure analysis over the AST computing, for each node, the set of
  codepoints that could appear first were evaluation to reach it, along with
  a did-not-consume bit: true when the node may match zero input, so a
  following sibling still contributes to the set. The result is a 257-entry
  bitmap (256 Latin-1 slots plus an "other" bit covering every codepoint
  above) consulted by `FindNextStart` to skip impossible positions.

  The oracle is kept only when the root consumes at least one codepoint on
  every path and the analysis left some bit clear; otherwise every position
  must be tried and the bitmap buys nothing.
*/

use bitvec::array::BitArray;
use bitvec::order::Lsb0;

use crate::ast::{NodeIndex, Op, ParsedRegex};
use crate::character::{to_lower, to_upper, Codepoint};

/// Byte-class bitmap over possible first codepoints.
#[derive(Clone, Debug, Default)]
pub struct StartChars {
  map: BitArray<[u64; 5], Lsb0>, //< 256 codepoint slots + the "other" bit
}

impl StartChars {
  pub const COUNT : usize = 256;
  pub const OTHER : usize = 256;

  /// Marks `cp` as a possible first codepoint.
  pub fn add(&mut self, cp: Codepoint) {
    if (cp as usize) < Self::COUNT {
      self.map.set(cp as usize, true);
    } else {
      self.map.set(Self::OTHER, true);
    }
  }

  pub fn add_all(&mut self) {
    self.map[..=Self::OTHER].fill(true);
  }

  /// Whether a match could start on `cp`.
  pub fn may_start(&self, cp: Codepoint) -> bool {
    if (cp as usize) < Self::COUNT {
      self.map[cp as usize]
    } else {
      self.map[Self::OTHER]
    }
  }

  fn all_set(&self) -> bool {
    self.map[..=Self::OTHER].all()
  }
}

/**
  Runs the analysis over a parsed regex, honouring the compilation
  direction. Returns `None` when the oracle would accept every position.
*/
pub fn compute_start_chars(parsed: &ParsedRegex, forward: bool) -> Option<StartChars> {
  let mut start_chars = StartChars::default();
  if node_start_chars(parsed, 0, forward, &mut start_chars) {
    return None;
  }
  if start_chars.all_set() {
    return None;
  }
  Some(start_chars)
}

// Fills the set according to which codepoints can start the given node,
// returning true if the node may not consume input, in which case a
// following node in sequence is still relevant to the parent's set.
fn node_start_chars(
  parsed: &ParsedRegex,
  index: NodeIndex,
  forward: bool,
  start_chars: &mut StartChars,
) -> bool {
  let node = &parsed.nodes[index as usize];
  match node.op {
    Op::Literal => {
      if (node.value as usize) < StartChars::COUNT && node.ignore_case {
        start_chars.add(to_lower(node.value));
        start_chars.add(to_upper(node.value));
      } else {
        start_chars.add(node.value);
      }
      node.quantifier.allows_none()
    }

    Op::AnyChar => {
      start_chars.add_all();
      node.quantifier.allows_none()
    }

    Op::Matcher => {
      let matcher = &parsed.matchers[node.value as usize];
      for cp in 0..StartChars::COUNT as Codepoint {
        if matcher(cp) {
          start_chars.add(cp);
        }
      }
      // The matcher is only probed over the Latin-1 slots; everything
      // above must be assumed possible.
      start_chars.add(StartChars::COUNT as Codepoint);
      node.quantifier.allows_none()
    }

    Op::Sequence => {
      let scan = |child| node_start_chars(parsed, child, forward, start_chars);
      let did_not_consume = match forward {
        true  => parsed.for_each_child(index, scan),
        false => parsed.for_each_child_reverse(index, scan),
      };
      did_not_consume || node.quantifier.allows_none()
    }

    Op::Alternation => {
      let mut all_consumed = !node.quantifier.allows_none();
      parsed.for_each_child(index, |child| {
        if node_start_chars(parsed, child, forward, start_chars) {
          all_consumed = false;
        }
        true
      });
      !all_consumed
    }

    // Zero-width: contributes nothing and never consumes.
    Op::LineStart
    | Op::LineEnd
    | Op::WordBoundary
    | Op::NotWordBoundary
    | Op::SubjectBegin
    | Op::SubjectEnd
    | Op::ResetStart
    | Op::LookAhead
    | Op::NegativeLookAhead
    | Op::LookBehind
    | Op::NegativeLookBehind => true,
  }
}
