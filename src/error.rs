/*!
  Errors surfaced by the pattern pipeline.

  Parsing failures identify the offending position as the literal pattern
  slices before and after the cursor; compilation failures report which hard
  limit was exceeded. Partial artefacts are discarded in both cases.
*/

use thiserror::Error;

use crate::limits::{MAX_AST_NODES, MAX_INSTRUCTIONS, MAX_QUANTIFIER_BOUND};

/// What went wrong, independent of where in the pattern it happened.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ErrorKind {
  #[error("unclosed parenthesis")]
  UnclosedParenthesis,
  #[error("unclosed character class")]
  UnclosedCharacterClass,
  #[error("unterminated hex sequence")]
  UnterminatedHexSequence,
  #[error("invalid hex digit '{0}'")]
  InvalidHexDigit(char),
  #[error("unterminated control escape")]
  UnterminatedControlEscape,
  #[error("invalid control escape character '{0}'")]
  InvalidControlEscape(char),
  #[error("unknown atom escape '{0}'")]
  UnknownEscape(char),
  #[error("unexpected '{0}'")]
  UnexpectedCharacter(char),
  #[error("invalid range specified")]
  InvalidClassRange,
  #[error("expected closing bracket")]
  ExpectedClosingBracket,
  #[error("explicit quantifier is too big, maximum is {}", MAX_QUANTIFIER_BOUND)]
  QuantifierTooBig,
  #[error("lookaround can only contain literals, any chars or character classes")]
  InvalidLookaroundAtom,
  #[error("quantifiers cannot be used in lookarounds")]
  QuantifiedLookaround,
  #[error("regex parsed to more than {} ast nodes", MAX_AST_NODES)]
  TooManyAstNodes,
}

/**
  A parse failure, pinpointing the cursor by splitting the pattern into the
  text already consumed and the text still pending.
*/
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("regex parse error: {kind} at '{before}<<<HERE>>>{after}'")]
pub struct ParseError {
  pub kind   : ErrorKind, //< What went wrong
  pub before : String,    //< Pattern text up to the cursor
  pub after  : String,    //< Pattern text from the cursor on
}

/// Any failure of the pattern-to-bytecode pipeline.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RegexError {
  #[error(transparent)]
  Parse(#[from] ParseError),

  #[error("regex compiled to more than {} instructions", MAX_INSTRUCTIONS)]
  TooManyInstructions,
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn parse_error_pinpoints_cursor() {
    let error = ParseError {
      kind: ErrorKind::UnclosedParenthesis,
      before: "a(b".to_string(),
      after: "".to_string(),
    };
    assert_eq!(
      error.to_string(),
      "regex parse error: unclosed parenthesis at 'a(b<<<HERE>>>'"
    );
  }

  #[test]
  fn compile_error_names_the_limit() {
    assert_eq!(
      RegexError::TooManyInstructions.to_string(),
      "regex compiled to more than 65535 instructions"
    );
  }
}
