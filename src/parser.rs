/*!
  Recursive-descent pattern parser.

  Mirrors the naming of the ECMAScript grammar productions (disjunction,
  alternative, term, atom) although the accepted syntax is not fully
  compatible. The parser owns a byte-offset cursor into the pattern and
  builds the flat AST in a single pass; on failure it reports the offending
  position as the literal pattern slices before and after the cursor.
*/

use log::debug;

use crate::ast::{
  AstNode, NodeIndex, Op, ParsedRegex, Quantifier, QuantifierKind, CAPTURE_NONE,
};
use crate::character::Codepoint;
use crate::charclass::{
  control_escape_value, find_class_escape, BuiltClass, CharRange, ClassBuilder,
};
use crate::error::{ErrorKind, ParseError};
use crate::limits::{MAX_AST_NODES, MAX_QUANTIFIER_BOUND};

type ParseResult<T> = Result<T, ParseError>;

/// Characters that may not appear bare outside a class or escape.
static SYNTAX_CHARACTERS: &str = "^$\\.*+?()[]{}|";

pub struct Parser<'a> {
  regex       : &'a str, //< The pattern text
  pos         : usize,   //< Byte offset of the cursor
  parsed      : ParsedRegex,
  ignore_case : bool,    //< Ambient `(?i)` flag, lexical to the cursor
}

impl<'a> Parser<'a> {
  pub fn parse(regex: &'a str) -> ParseResult<ParsedRegex> {
    let mut parser = Parser {
      regex,
      pos: 0,
      parsed: ParsedRegex { nodes: Vec::new(), capture_count: 1, matchers: Vec::new() },
      ignore_case: false,
    };

    let root = parser.disjunction(0)?;
    debug_assert_eq!(root, 0);

    if !parser.at_end() {
      // Only an unbalanced ')' can stop the outer disjunction early.
      return Err(parser.error(ErrorKind::UnexpectedCharacter(')')));
    }

    debug!(
      "parsed {:?}: {} nodes, {} captures, {} matchers",
      regex,
      parser.parsed.nodes.len(),
      parser.parsed.capture_count,
      parser.parsed.matchers.len()
    );
    Ok(parser.parsed)
  }

  // region Cursor helpers

  fn at_end(&self) -> bool {
    self.pos >= self.regex.len()
  }

  /// The codepoint at the cursor, if any.
  fn peek(&self) -> Option<char> {
    self.regex[self.pos..].chars().next()
  }

  /// The codepoint one past the cursor, if any.
  fn peek_second(&self) -> Option<char> {
    let mut chars = self.regex[self.pos..].chars();
    chars.next();
    chars.next()
  }

  /// Advances the cursor past `c`, which must be the codepoint at the cursor.
  fn bump(&mut self, c: char) {
    self.pos += c.len_utf8();
  }

  fn next_char(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.bump(c);
    Some(c)
  }

  /// Consumes `expected` if the pattern continues with it.
  fn accept(&mut self, expected: &str) -> bool {
    if self.regex[self.pos..].starts_with(expected) {
      self.pos += expected.len();
      true
    } else {
      false
    }
  }

  fn error(&self, kind: ErrorKind) -> ParseError {
    ParseError {
      kind,
      before: self.regex[..self.pos].to_string(),
      after: self.regex[self.pos..].to_string(),
    }
  }

  // endregion

  // region Grammar productions

  fn disjunction(&mut self, capture: Codepoint) -> ParseResult<NodeIndex> {
    let index = self.new_node_with_value(Op::Alternation, capture)?;
    loop {
      self.alternative(Op::Sequence)?;
      if self.peek() != Some('|') {
        break;
      }
      self.bump('|');
    }
    self.parsed.nodes[index as usize].children_end = self.parsed.nodes.len() as NodeIndex;

    Ok(index)
  }

  fn alternative(&mut self, op: Op) -> ParseResult<NodeIndex> {
    let index = self.new_node(op)?;
    while self.term()?.is_some() {}
    self.parsed.nodes[index as usize].children_end = self.parsed.nodes.len() as NodeIndex;

    Ok(index)
  }

  fn term(&mut self) -> ParseResult<Option<NodeIndex>> {
    while self.modifiers() {}

    if let Some(node) = self.assertion()? {
      return Ok(Some(node));
    }
    if let Some(node) = self.atom()? {
      let quantifier = self.quantifier()?;
      self.parsed.nodes[node as usize].quantifier = quantifier;
      return Ok(Some(node));
    }
    Ok(None)
  }

  /// `(?i)` sets the ambient case-insensitivity flag, `(?I)` clears it. The
  /// flag is lexical to the cursor and not reset by parentheses.
  fn modifiers(&mut self) -> bool {
    if self.accept("(?i)") {
      self.ignore_case = true;
      return true;
    }
    if self.accept("(?I)") {
      self.ignore_case = false;
      return true;
    }
    false
  }

  fn assertion(&mut self) -> ParseResult<Option<NodeIndex>> {
    let c = match self.peek() {
      Some(c) => c,
      None => return Ok(None),
    };

    match c {
      '^' => {
        self.bump(c);
        return self.new_node(Op::LineStart).map(Some);
      }
      '$' => {
        self.bump(c);
        return self.new_node(Op::LineEnd).map(Some);
      }
      '\\' => {
        let op = match self.peek_second() {
          Some('b') => Some(Op::WordBoundary),
          Some('B') => Some(Op::NotWordBoundary),
          Some('A') => Some(Op::SubjectBegin),
          Some('z') => Some(Op::SubjectEnd),
          Some('K') => Some(Op::ResetStart),
          _ => None,
        };
        if let Some(op) = op {
          self.pos += 2;
          return self.new_node(op).map(Some);
        }
      }
      '(' => {
        static LOOKAROUNDS: [(&str, Op); 4] = [
          ("(?=", Op::LookAhead),
          ("(?!", Op::NegativeLookAhead),
          ("(?<=", Op::LookBehind),
          ("(?<!", Op::NegativeLookBehind),
        ];
        for (prefix, op) in LOOKAROUNDS.iter() {
          if self.accept(prefix) {
            let lookaround = self.alternative(*op)?;
            if !self.accept(")") {
              return Err(self.error(ErrorKind::UnclosedParenthesis));
            }
            self.validate_lookaround(lookaround)?;
            return Ok(Some(lookaround));
          }
        }
      }
      _ => {}
    }
    Ok(None)
  }

  fn atom(&mut self) -> ParseResult<Option<NodeIndex>> {
    let cp = match self.peek() {
      Some(c) => c,
      None => return Ok(None),
    };

    match cp {
      '.' => {
        self.bump(cp);
        self.new_node(Op::AnyChar).map(Some)
      }
      '(' => {
        self.bump(cp);
        let value = match self.accept("?:") {
          true => CAPTURE_NONE,
          false => {
            let index = self.parsed.capture_count;
            self.parsed.capture_count += 1;
            index
          }
        };
        let content = self.disjunction(value)?;
        if !self.accept(")") {
          return Err(self.error(ErrorKind::UnclosedParenthesis));
        }
        Ok(Some(content))
      }
      '\\' => {
        self.bump(cp);
        self.atom_escape().map(Some)
      }
      '[' => {
        self.bump(cp);
        self.character_class().map(Some)
      }
      '|' | ')' => Ok(None),
      _ => {
        if "^$.*+?[]{}".contains(cp) {
          return Err(self.error(ErrorKind::UnexpectedCharacter(cp)));
        }
        self.bump(cp);
        self.new_node_with_value(Op::Literal, cp as Codepoint).map(Some)
      }
    }
  }

  // endregion

  // region Escapes

  fn atom_escape(&mut self) -> ParseResult<NodeIndex> {
    let cp = match self.next_char() {
      Some(c) => c,
      None => return Err(self.error(ErrorKind::UnknownEscape('\\'))),
    };

    // `\Q...\E` introduces a literal run.
    if cp == 'Q' {
      let sequence = self.new_node(Op::Sequence)?;
      let quote_end = self.regex[self.pos..].find("\\E").map(|offset| self.pos + offset);

      let end = quote_end.unwrap_or(self.regex.len());
      while self.pos < end {
        let c = self.next_char().unwrap();
        self.new_node_with_value(Op::Literal, c as Codepoint)?;
      }
      self.parsed.nodes[sequence as usize].children_end = self.parsed.nodes.len() as NodeIndex;

      if quote_end.is_some() {
        self.pos += 2;
      }
      return Ok(sequence);
    }

    // CharacterClassEscape: desugars to a matcher over a character property
    // plus a handful of extra literals; the upper-case form complements it.
    if let Some(escape) = find_class_escape(cp) {
      let matcher_id = self.parsed.matchers.len() as Codepoint;
      self.parsed.matchers.push(escape.build_matcher(cp.is_ascii_uppercase()));
      return self.new_node_with_value(Op::Matcher, matcher_id);
    }

    // CharacterEscape
    if let Some(value) = control_escape_value(cp) {
      return self.new_node_with_value(Op::Literal, value);
    }

    match cp {
      '0' => self.new_node_with_value(Op::Literal, 0),
      'c' => {
        let ctrl = match self.next_char() {
          Some(c) => c,
          None => return Err(self.error(ErrorKind::UnterminatedControlEscape)),
        };
        if ctrl.is_ascii_alphabetic() {
          self.new_node_with_value(Op::Literal, ctrl as Codepoint % 32)
        } else {
          Err(self.error(ErrorKind::InvalidControlEscape(ctrl)))
        }
      }
      'x' => {
        let value = self.read_hex(2)?;
        self.new_node_with_value(Op::Literal, value)
      }
      'u' => {
        let value = self.read_hex(4)?;
        self.new_node_with_value(Op::Literal, value)
      }
      cp if SYNTAX_CHARACTERS.contains(cp) => {
        self.new_node_with_value(Op::Literal, cp as Codepoint)
      }
      cp => Err(self.error(ErrorKind::UnknownEscape(cp))),
    }
  }

  /// Reads exactly `count` hex digits into a codepoint.
  fn read_hex(&mut self, count: usize) -> ParseResult<Codepoint> {
    let mut res: Codepoint = 0;
    for _ in 0..count {
      let digit = match self.next_char() {
        Some(c) => c,
        None => return Err(self.error(ErrorKind::UnterminatedHexSequence)),
      };
      let value = match digit.to_digit(16) {
        Some(v) => v,
        None => return Err(self.error(ErrorKind::InvalidHexDigit(digit))),
      };
      res = res * 16 + value;
    }
    Ok(res)
  }

  // endregion

  // region Character classes

  fn character_class(&mut self) -> ParseResult<NodeIndex> {
    let mut builder = ClassBuilder::default();
    if self.peek() == Some('^') {
      builder.negative = true;
      self.bump('^');
    }

    while let Some(c) = self.peek() {
      if c == ']' {
        break;
      }
      let mut cp = self.next_char().unwrap();

      // A bare dash is the literal dash.
      if cp == '-' {
        builder.ranges.push(CharRange { min: '-' as Codepoint, max: '-' as Codepoint });
        continue;
      }

      if self.at_end() {
        break;
      }

      if cp == '\\' {
        let escaped = self.peek().unwrap();
        if let Some(escape) = find_class_escape(escaped) {
          // A positive class escape contributes ranges; the negative form
          // contributes to the excluded set. Both record their predicate.
          let negated = escaped.is_ascii_uppercase();
          if let Some(property) = escape.property {
            builder.properties.push((property, !negated));
          }
          for c in escape.additional_chars.chars() {
            if negated {
              builder.excluded.push(c as Codepoint);
            } else {
              builder.ranges.push(CharRange { min: c as Codepoint, max: c as Codepoint });
            }
          }
          self.bump(escaped);
          continue;
        }

        // Just an escaped character.
        cp = self.next_char().unwrap();
        if let Some(value) = control_escape_value(cp) {
          cp = char::from_u32(value).unwrap_or(cp);
        }
      }

      let mut range = CharRange { min: cp as Codepoint, max: cp as Codepoint };
      if self.peek() == Some('-') {
        self.bump('-');
        if self.at_end() {
          break;
        }
        if self.peek() != Some(']') {
          range.max = self.next_char().unwrap() as Codepoint;
          if range.min > range.max {
            return Err(self.error(ErrorKind::InvalidClassRange));
          }
        } else {
          // A trailing dash is the literal dash.
          builder.ranges.push(range);
          range = CharRange { min: '-' as Codepoint, max: '-' as Codepoint };
        }
      }
      builder.ranges.push(range);
    }

    if self.at_end() {
      return Err(self.error(ErrorKind::UnclosedCharacterClass));
    }
    self.bump(']');

    match builder.build(self.ignore_case) {
      BuiltClass::Singleton(cp) => self.new_node_with_value(Op::Literal, cp),
      BuiltClass::Matcher(matcher) => {
        let matcher_id = self.parsed.matchers.len() as Codepoint;
        self.parsed.matchers.push(matcher);
        self.new_node_with_value(Op::Matcher, matcher_id)
      }
    }
  }

  // endregion

  // region Quantifiers

  fn quantifier(&mut self) -> ParseResult<Quantifier> {
    let c = match self.peek() {
      Some(c) => c,
      None => return Ok(Quantifier::default()),
    };

    match c {
      '*' => {
        self.bump(c);
        Ok(Quantifier::new(QuantifierKind::RepeatZeroOrMore, self.check_greedy()))
      }
      '+' => {
        self.bump(c);
        Ok(Quantifier::new(QuantifierKind::RepeatOneOrMore, self.check_greedy()))
      }
      '?' => {
        self.bump(c);
        Ok(Quantifier::new(QuantifierKind::Optional, self.check_greedy()))
      }
      '{' => {
        self.bump(c);
        let min = self.read_bound()?;
        let mut max = min;
        if self.peek() == Some(',') {
          self.bump(',');
          max = self.read_bound()?;
        }
        if self.peek() != Some('}') {
          return Err(self.error(ErrorKind::ExpectedClosingBracket));
        }
        self.bump('}');
        Ok(Quantifier {
          kind: QuantifierKind::RepeatMinMax,
          greedy: self.check_greedy(),
          min,
          max,
        })
      }
      _ => Ok(Quantifier::default()),
    }
  }

  /// Reads a decimal bound, or -1 when no digits are present.
  fn read_bound(&mut self) -> ParseResult<i32> {
    let mut res: i32 = -1;
    while let Some(c) = self.peek() {
      let digit = match c.to_digit(10) {
        Some(d) => d as i32,
        None => break,
      };
      self.bump(c);
      res = if res < 0 { digit } else { res * 10 + digit };
      if res > MAX_QUANTIFIER_BOUND {
        return Err(self.error(ErrorKind::QuantifierTooBig));
      }
    }
    Ok(res)
  }

  /// A trailing `?` flips a quantifier from greedy to reluctant.
  fn check_greedy(&mut self) -> bool {
    if self.peek() == Some('?') {
      self.bump('?');
      return false;
    }
    true
  }

  // endregion

  fn new_node(&mut self, op: Op) -> ParseResult<NodeIndex> {
    self.new_node_with_value(op, CAPTURE_NONE)
  }

  fn new_node_with_value(&mut self, op: Op, value: Codepoint) -> ParseResult<NodeIndex> {
    let index = self.parsed.nodes.len();
    if index >= MAX_AST_NODES {
      return Err(self.error(ErrorKind::TooManyAstNodes));
    }
    self.parsed.nodes.push(AstNode {
      op,
      ignore_case: self.ignore_case,
      children_end: index as NodeIndex + 1,
      value,
      quantifier: Quantifier::default(),
    });
    Ok(index as NodeIndex)
  }

  /// Lookaround bodies may only contain unquantified literals, any-chars,
  /// and character classes; anything else is rejected at parse time.
  fn validate_lookaround(&self, index: NodeIndex) -> ParseResult<()> {
    let mut invalid = None;
    self.parsed.for_each_child(index, |child| {
      let node = &self.parsed.nodes[child as usize];
      if node.op != Op::Literal && node.op != Op::Matcher && node.op != Op::AnyChar {
        invalid = Some(ErrorKind::InvalidLookaroundAtom);
        return false;
      }
      if node.quantifier.kind != QuantifierKind::One {
        invalid = Some(ErrorKind::QuantifiedLookaround);
        return false;
      }
      true
    });

    match invalid {
      Some(kind) => Err(self.error(kind)),
      None => Ok(()),
    }
  }
}
