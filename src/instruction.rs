/*!
  The bytecode instruction set.

  An instruction is a fixed (opcode, 32-bit parameter) record. The parameter
  is operator-dependent: a codepoint for literals, a matcher-table index, a
  jump/split target, a capture slot, or an offset into the lookaround table.

  Lookaround bodies are flattened into a shared table of codepoint codes,
  terminated by `LOOKAROUND_END` between bodies. Codes below `ANY_CHAR_CODE`
  are literal codepoints; `ANY_CHAR_CODE` stands for `.`; codes at or above
  `MATCHER_BASE_CODE` reference matcher `code - MATCHER_BASE_CODE`.
*/

use std::fmt::{Display, Formatter};

use crate::character::Codepoint;

// Lookaround table codes.
pub const LOOKAROUND_END    : Codepoint = u32::MAX; //< Terminator between bodies
pub const ANY_CHAR_CODE     : Codepoint = 0xF000;
pub const MATCHER_BASE_CODE : Codepoint = 0xF0001;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CompiledOp {
  Literal,
  LiteralIgnoreCase,
  AnyChar,
  Matcher,
  Jump,
  SplitPrioritizeParent,
  SplitPrioritizeChild,
  Save,
  LineStart,
  LineEnd,
  WordBoundary,
  NotWordBoundary,
  SubjectBegin,
  SubjectEnd,
  LookAhead,
  NegativeLookAhead,
  LookBehind,
  NegativeLookBehind,
  LookAheadIgnoreCase,
  NegativeLookAheadIgnoreCase,
  LookBehindIgnoreCase,
  NegativeLookBehindIgnoreCase,
  FindNextStart,
  Match,
}

impl CompiledOp {
  pub fn is_lookaround(&self) -> bool {
    matches!(
      self,
      CompiledOp::LookAhead
        | CompiledOp::NegativeLookAhead
        | CompiledOp::LookBehind
        | CompiledOp::NegativeLookBehind
        | CompiledOp::LookAheadIgnoreCase
        | CompiledOp::NegativeLookAheadIgnoreCase
        | CompiledOp::LookBehindIgnoreCase
        | CompiledOp::NegativeLookBehindIgnoreCase
    )
  }
}

#[derive(Copy, Clone, Debug)]
pub struct Instruction {
  pub op    : CompiledOp,
  pub param : u32,
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let literal = |cp: u32| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER);
    match self.op {
      CompiledOp::Literal           => write!(f, "literal {}", literal(self.param)),
      CompiledOp::LiteralIgnoreCase => write!(f, "literal (ignore case) {}", literal(self.param)),
      CompiledOp::AnyChar           => write!(f, "any char"),
      CompiledOp::Matcher           => write!(f, "matcher {}", self.param),
      CompiledOp::Jump              => write!(f, "jump {}", self.param),
      CompiledOp::SplitPrioritizeParent => write!(f, "split (prioritize parent) {}", self.param),
      CompiledOp::SplitPrioritizeChild  => write!(f, "split (prioritize child) {}", self.param),
      CompiledOp::Save              => write!(f, "save {}", self.param),
      CompiledOp::LineStart         => write!(f, "line start"),
      CompiledOp::LineEnd           => write!(f, "line end"),
      CompiledOp::WordBoundary      => write!(f, "word boundary"),
      CompiledOp::NotWordBoundary   => write!(f, "not word boundary"),
      CompiledOp::SubjectBegin      => write!(f, "subject begin"),
      CompiledOp::SubjectEnd        => write!(f, "subject end"),
      CompiledOp::LookAhead         => write!(f, "look ahead @{}", self.param),
      CompiledOp::NegativeLookAhead => write!(f, "negative look ahead @{}", self.param),
      CompiledOp::LookBehind        => write!(f, "look behind @{}", self.param),
      CompiledOp::NegativeLookBehind => write!(f, "negative look behind @{}", self.param),
      CompiledOp::LookAheadIgnoreCase => write!(f, "look ahead (ignore case) @{}", self.param),
      CompiledOp::NegativeLookAheadIgnoreCase => {
        write!(f, "negative look ahead (ignore case) @{}", self.param)
      }
      CompiledOp::LookBehindIgnoreCase => write!(f, "look behind (ignore case) @{}", self.param),
      CompiledOp::NegativeLookBehindIgnoreCase => {
        write!(f, "negative look behind (ignore case) @{}", self.param)
      }
      CompiledOp::FindNextStart => write!(f, "find next start"),
      CompiledOp::Match         => write!(f, "match"),
    }
  }
}
