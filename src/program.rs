/*!
  The compiled artefact.

  A `CompiledRegex` owns everything execution needs: the instruction stream,
  the flattened lookaround table, the matcher closures (moved out of the
  parsed regex), the number of capture slots, the direction the program was
  compiled for, and the optional start-character oracle. It is immutable
  once built and safe to share across threads; per-execution state lives in
  the VM.
*/

use std::fmt::{Display, Formatter};

use crate::character::Codepoint;
use crate::charclass::CharMatcher;
use crate::instruction::{
  Instruction, ANY_CHAR_CODE, LOOKAROUND_END, MATCHER_BASE_CODE,
};
use crate::oracle::StartChars;

/// Flags accepted by the compile entry point.
#[derive(Copy, Clone, Default, Debug)]
pub struct CompileFlags {
  /// Suppress `Save` emission for captures other than the whole match.
  pub no_subs: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MatchDirection {
  Forward,
  Backward,
}

pub struct CompiledRegex {
  pub instructions : Vec<Instruction>,
  pub lookarounds  : Vec<Codepoint>, //< Flattened lookaround bodies, `LOOKAROUND_END`-terminated
  pub matchers     : Vec<CharMatcher>,
  pub save_count   : u32,            //< 2 slots per capture group
  pub direction    : MatchDirection,
  pub start_chars  : Option<StartChars>,
}

impl CompiledRegex {
  /// Decodes the lookaround body starting at `offset` for display purposes.
  fn lookaround_body(&self, offset: u32) -> String {
    let mut body = String::new();
    for &code in &self.lookarounds[offset as usize..] {
      match code {
        LOOKAROUND_END => break,
        ANY_CHAR_CODE  => body.push('.'),
        code if code >= MATCHER_BASE_CODE => {
          body.push_str(&format!("<matcher {}>", code - MATCHER_BASE_CODE));
        }
        code => body.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)),
      }
    }
    body
  }
}

impl std::fmt::Debug for CompiledRegex {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CompiledRegex")
      .field("instructions", &self.instructions)
      .field("lookarounds", &self.lookarounds)
      .field("matchers", &self.matchers.len())
      .field("save_count", &self.save_count)
      .field("direction", &self.direction)
      .field("start_chars", &self.start_chars.is_some())
      .finish()
  }
}

impl Display for CompiledRegex {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for (count, inst) in self.instructions.iter().enumerate() {
      if inst.op.is_lookaround() {
        writeln!(f, " {:03}     {} ({})", count, inst, self.lookaround_body(inst.param))?;
      } else {
        writeln!(f, " {:03}     {}", count, inst)?;
      }
    }
    Ok(())
  }
}
