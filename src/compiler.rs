/*!
  Lowers the flat AST into the bytecode instruction stream.

  Every program starts with a three-instruction search prefix enabling
  unanchored evaluation: a split preferring the pattern body, a
  `FindNextStart` that advances the candidate start position, and a split
  looping back to it. A VM matches at the start by entering after the
  prefix, or searches anywhere by entering at instruction 0.

  Forward and backward compilation share the AST and differ only in child
  traversal order for sequences, the line/subject anchor swaps, the
  ahead/behind swap for lookarounds, lookaround body orientation, and the
  order of the two `Save` writes per capture group.
*/

use smallvec::SmallVec;

use crate::ast::{NodeIndex, Op, ParsedRegex};
use crate::character::to_lower;
use crate::charclass::CharMatcher;
use crate::error::RegexError;
use crate::instruction::{
  CompiledOp, Instruction, ANY_CHAR_CODE, LOOKAROUND_END, MATCHER_BASE_CODE,
};
use crate::limits::{MAX_INSTRUCTIONS, SEARCH_PREFIX_SIZE};
use crate::oracle::compute_start_chars;
use crate::program::{CompileFlags, CompiledRegex, MatchDirection};

type PatchList = SmallVec<[u32; 4]>;

/// Compiles a parsed regex for the given direction, consuming it; the
/// matcher closures move into the compiled program.
pub fn compile(
  parsed: ParsedRegex,
  flags: CompileFlags,
  direction: MatchDirection,
) -> Result<CompiledRegex, RegexError> {
  let mut compiler = Compiler {
    parsed: &parsed,
    flags,
    forward: direction == MatchDirection::Forward,
    instructions: Vec::new(),
    lookarounds: Vec::new(),
  };

  compiler.write_search_prefix()?;
  compiler.compile_node(0)?;
  compiler.push_inst(CompiledOp::Match, 0)?;

  let start_chars = compute_start_chars(&parsed, compiler.forward);
  let Compiler { instructions, lookarounds, .. } = compiler;
  let save_count = parsed.capture_count * 2;
  let matchers: Vec<CharMatcher> = parsed.matchers;

  log::debug!(
    "compiled to {} instructions, {} lookaround codes, oracle: {}",
    instructions.len(),
    lookarounds.len(),
    start_chars.is_some()
  );

  Ok(CompiledRegex { instructions, lookarounds, matchers, save_count, direction, start_chars })
}

struct Compiler<'a> {
  parsed       : &'a ParsedRegex,
  flags        : CompileFlags,
  forward      : bool,
  instructions : Vec<Instruction>,
  lookarounds  : Vec<u32>,
}

impl<'a> Compiler<'a> {
  /// Emits the three-instruction prefix the search entry point relies on.
  fn write_search_prefix(&mut self) -> Result<(), RegexError> {
    debug_assert!(self.instructions.is_empty());
    self.push_inst(CompiledOp::SplitPrioritizeChild, SEARCH_PREFIX_SIZE)?;
    self.push_inst(CompiledOp::FindNextStart, 0)?;
    self.push_inst(CompiledOp::SplitPrioritizeParent, 1)?;
    Ok(())
  }

  /**
    Emits a node with its quantifier: an optional leading split for
    quantifiers that allow zero matches, the body repeated for the mandatory
    count, then either a back-edge split for unbounded repetition or
    split-guarded copies up to the bound. All forward splits are patched to
    the end of the block.
  */
  fn compile_node(&mut self, index: NodeIndex) -> Result<u32, RegexError> {
    let start_pos = self.instructions.len() as u32;
    let quantifier = self.parsed.nodes[index as usize].quantifier;
    let mut goto_ends = PatchList::new();

    if quantifier.allows_none() {
      let split = self.push_inst(
        match quantifier.greedy {
          true  => CompiledOp::SplitPrioritizeParent,
          false => CompiledOp::SplitPrioritizeChild,
        },
        0,
      )?;
      goto_ends.push(split);
    }

    let mut inner_pos = self.compile_node_inner(index)?;
    // Write the node multiple times when we have a min count quantifier.
    for _ in 1..quantifier.min {
      inner_pos = self.compile_node_inner(index)?;
    }

    if quantifier.allows_infinite_repeat() {
      self.push_inst(
        match quantifier.greedy {
          true  => CompiledOp::SplitPrioritizeChild,
          false => CompiledOp::SplitPrioritizeParent,
        },
        inner_pos,
      )?;
    } else {
      // Write the node as an optional match for the min -> max counts.
      for _ in std::cmp::max(1, quantifier.min)..quantifier.max {
        let split = self.push_inst(
          match quantifier.greedy {
            true  => CompiledOp::SplitPrioritizeParent,
            false => CompiledOp::SplitPrioritizeChild,
          },
          0,
        )?;
        goto_ends.push(split);
        self.compile_node_inner(index)?;
      }
    }

    let end = self.instructions.len() as u32;
    for offset in goto_ends {
      self.instructions[offset as usize].param = end;
    }

    Ok(start_pos)
  }

  fn compile_node_inner(&mut self, index: NodeIndex) -> Result<u32, RegexError> {
    let parsed = self.parsed;
    let node = parsed.nodes[index as usize];
    let start_pos = self.instructions.len() as u32;
    let ignore_case = node.ignore_case;

    // Alternation doubles as the capture carrier; index 0 is the whole
    // match and survives NoSubs.
    let save = node.op == Op::Alternation
      && (node.value == 0 || (node.value != crate::ast::CAPTURE_NONE && !self.flags.no_subs));
    if save {
      let slot = node.value * 2 + if self.forward { 0 } else { 1 };
      self.push_inst(CompiledOp::Save, slot)?;
    }

    let mut goto_inner_end_offsets = PatchList::new();
    match node.op {
      Op::Literal => {
        if ignore_case {
          self.push_inst(CompiledOp::LiteralIgnoreCase, to_lower(node.value))?;
        } else {
          self.push_inst(CompiledOp::Literal, node.value)?;
        }
      }

      Op::AnyChar => {
        self.push_inst(CompiledOp::AnyChar, 0)?;
      }

      Op::Matcher => {
        self.push_inst(CompiledOp::Matcher, node.value)?;
      }

      Op::Sequence => {
        let forward = self.forward;
        let mut result: Result<(), RegexError> = Ok(());
        let compile_child = |child: NodeIndex| match self.compile_node(child) {
          Ok(_)  => true,
          Err(e) => {
            result = Err(e);
            false
          }
        };
        match forward {
          true  => parsed.for_each_child(index, compile_child),
          false => parsed.for_each_child_reverse(index, compile_child),
        };
        result?;
      }

      Op::Alternation => {
        // One prioritize-parent split per alternative except the first; the
        // splits are patched to each alternative's entry afterwards.
        let mut split_pos = self.instructions.len();
        let mut result: Result<(), RegexError> = Ok(());
        parsed.for_each_child(index, |child| {
          if child != index + 1 {
            if let Err(e) = self.push_inst(CompiledOp::SplitPrioritizeParent, 0) {
              result = Err(e);
              return false;
            }
          }
          true
        });
        result?;

        let mut result: Result<(), RegexError> = Ok(());
        let end = node.children_end;
        parsed.for_each_child(index, |child| {
          let alternative = match self.compile_node(child) {
            Ok(pos) => pos,
            Err(e) => {
              result = Err(e);
              return false;
            }
          };
          if child != index + 1 {
            self.instructions[split_pos].param = alternative;
            split_pos += 1;
          }
          // Every alternative but the last jumps to the block end.
          if parsed.nodes[child as usize].children_end != end {
            match self.push_inst(CompiledOp::Jump, 0) {
              Ok(jump) => goto_inner_end_offsets.push(jump),
              Err(e) => {
                result = Err(e);
                return false;
              }
            }
          }
          true
        });
        result?;
      }

      Op::LookAhead => {
        let op = match (self.forward, ignore_case) {
          (true, false)  => CompiledOp::LookAhead,
          (true, true)   => CompiledOp::LookAheadIgnoreCase,
          (false, false) => CompiledOp::LookBehind,
          (false, true)  => CompiledOp::LookBehindIgnoreCase,
        };
        let table_offset = self.push_lookaround(index, false, ignore_case);
        self.push_inst(op, table_offset)?;
      }

      Op::NegativeLookAhead => {
        let op = match (self.forward, ignore_case) {
          (true, false)  => CompiledOp::NegativeLookAhead,
          (true, true)   => CompiledOp::NegativeLookAheadIgnoreCase,
          (false, false) => CompiledOp::NegativeLookBehind,
          (false, true)  => CompiledOp::NegativeLookBehindIgnoreCase,
        };
        let table_offset = self.push_lookaround(index, false, ignore_case);
        self.push_inst(op, table_offset)?;
      }

      Op::LookBehind => {
        let op = match (self.forward, ignore_case) {
          (true, false)  => CompiledOp::LookBehind,
          (true, true)   => CompiledOp::LookBehindIgnoreCase,
          (false, false) => CompiledOp::LookAhead,
          (false, true)  => CompiledOp::LookAheadIgnoreCase,
        };
        let table_offset = self.push_lookaround(index, true, ignore_case);
        self.push_inst(op, table_offset)?;
      }

      Op::NegativeLookBehind => {
        let op = match (self.forward, ignore_case) {
          (true, false)  => CompiledOp::NegativeLookBehind,
          (true, true)   => CompiledOp::NegativeLookBehindIgnoreCase,
          (false, false) => CompiledOp::NegativeLookAhead,
          (false, true)  => CompiledOp::NegativeLookAheadIgnoreCase,
        };
        let table_offset = self.push_lookaround(index, true, ignore_case);
        self.push_inst(op, table_offset)?;
      }

      Op::LineStart => {
        self.push_inst(
          match self.forward {
            true  => CompiledOp::LineStart,
            false => CompiledOp::LineEnd,
          },
          0,
        )?;
      }

      Op::LineEnd => {
        self.push_inst(
          match self.forward {
            true  => CompiledOp::LineEnd,
            false => CompiledOp::LineStart,
          },
          0,
        )?;
      }

      Op::WordBoundary => {
        self.push_inst(CompiledOp::WordBoundary, 0)?;
      }

      Op::NotWordBoundary => {
        self.push_inst(CompiledOp::NotWordBoundary, 0)?;
      }

      Op::SubjectBegin => {
        self.push_inst(
          match self.forward {
            true  => CompiledOp::SubjectBegin,
            false => CompiledOp::SubjectEnd,
          },
          0,
        )?;
      }

      Op::SubjectEnd => {
        self.push_inst(
          match self.forward {
            true  => CompiledOp::SubjectEnd,
            false => CompiledOp::SubjectBegin,
          },
          0,
        )?;
      }

      Op::ResetStart => {
        self.push_inst(CompiledOp::Save, 0)?;
      }
    }

    let end = self.instructions.len() as u32;
    for offset in goto_inner_end_offsets {
      self.instructions[offset as usize].param = end;
    }

    if save {
      let slot = node.value * 2 + if self.forward { 1 } else { 0 };
      self.push_inst(CompiledOp::Save, slot)?;
    }

    Ok(start_pos)
  }

  /**
    Flattens a lookaround body into the shared table, returning the body's
    start offset. The body is written reversed for behind-style scans so the
    VM can always walk the table left to right.
  */
  fn push_lookaround(&mut self, index: NodeIndex, reversed: bool, ignore_case: bool) -> u32 {
    let table_offset = self.lookarounds.len() as u32;
    let parsed = self.parsed;

    let mut write_code = |child: NodeIndex| {
      let node = &parsed.nodes[child as usize];
      let code = match node.op {
        Op::Literal if ignore_case => to_lower(node.value),
        Op::Literal => node.value,
        Op::AnyChar => ANY_CHAR_CODE,
        Op::Matcher => MATCHER_BASE_CODE + node.value,
        // Body contents were validated during parsing.
        _ => unreachable!("lookaround bodies contain only literals, any chars and matchers"),
      };
      self.lookarounds.push(code);
      true
    };

    match reversed {
      true  => parsed.for_each_child_reverse(index, &mut write_code),
      false => parsed.for_each_child(index, &mut write_code),
    };

    self.lookarounds.push(LOOKAROUND_END);
    table_offset
  }

  fn push_inst(&mut self, op: CompiledOp, param: u32) -> Result<u32, RegexError> {
    let res = self.instructions.len();
    if res >= MAX_INSTRUCTIONS {
      return Err(RegexError::TooManyInstructions);
    }
    self.instructions.push(Instruction { op, param });
    Ok(res as u32)
  }
}
