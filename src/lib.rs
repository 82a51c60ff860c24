/*!
  A regular-expression engine built as a pipeline: a recursive-descent
  parser producing a flat AST, a compiler lowering the AST into bytecode for
  a threaded VM, a start-character oracle accelerating unanchored search,
  and the VM itself. Programs can be compiled for forward or backward
  evaluation over a Unicode subject, recovering submatch captures either
  way.
*/

pub mod ast;
pub mod character;
pub mod charclass;
pub mod compiler;
pub mod error;
pub mod instruction;
pub mod limits;
pub mod oracle;
pub mod parser;
pub mod program;
pub mod vm;

pub use error::{ErrorKind, ParseError, RegexError};
pub use program::{CompileFlags, CompiledRegex, MatchDirection};
pub use vm::{ExecFlags, Match, ThreadedVm};

/// Compiles `pattern` into a program for the given direction.
pub fn compile_regex(
  pattern: &str,
  flags: CompileFlags,
  direction: MatchDirection,
) -> Result<CompiledRegex, RegexError> {
  let parsed = parser::Parser::parse(pattern)?;
  compiler::compile(parsed, flags, direction)
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  fn forward(pattern: &str) -> CompiledRegex {
    compile_regex(pattern, CompileFlags::default(), MatchDirection::Forward).unwrap()
  }

  #[test]
  fn end_to_end_pipeline() {
    let program = forward("(?i)a+(b|c)$");
    let vm = ThreadedVm::new(&program);
    let subject = "aaAC";
    let m = vm.exec(subject, ExecFlags::default()).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("aaAC"));
    assert_eq!(m.group_str(subject, 1), Some("C"));
  }

  #[test]
  fn parse_errors_surface_through_the_entry_point() {
    let error = compile_regex("a(b", CompileFlags::default(), MatchDirection::Forward);
    assert_eq!(
      error.unwrap_err().to_string(),
      "regex parse error: unclosed parenthesis at 'a(b<<<HERE>>>'"
    );
  }

  #[test]
  fn program_listing_is_printable() {
    let listing = forward("a|(?=b)").to_string();
    assert!(listing.contains("find next start"));
    assert!(listing.contains("literal a"));
    assert!(listing.contains("look ahead @0 (b)"));
    assert!(listing.contains("match"));
  }

  #[test]
  fn matching_is_direction_symmetric_without_anchors() {
    let forward_program = forward("ab(c|d)e*");
    let backward_program =
      compile_regex("ab(c|d)e*", CompileFlags::default(), MatchDirection::Backward).unwrap();

    for subject in ["abc", "abd", "abcee", "abdeee", "abe", "xabc", ""] {
      let fwd = ThreadedVm::new(&forward_program)
        .exec(subject, ExecFlags::default())
        .is_some();
      let bck = ThreadedVm::new(&backward_program)
        .exec(subject, ExecFlags::default())
        .is_some();
      assert_eq!(fwd, bck, "direction mismatch for {:?}", subject);
    }
  }
}
