/*!
  A threaded VM for the compiled bytecode.

  Execution maintains a priority-ordered list of threads, each an
  instruction pointer plus a clone-on-write set of capture slots. Zero-width
  instructions are expanded eagerly into the list (an epsilon closure with
  per-step duplicate suppression, which also bounds zero-width loops such as
  `()*`); consuming instructions wait for the next codepoint. When a thread
  reaches `Match`, lower-priority threads are cut and surviving
  higher-priority threads may still improve the match.

  The interpreter is direction-agnostic: the subject is presented as a scan
  sequence (reversed for backward programs) and every assertion is evaluated
  scan-relative. The compiler's anchor and lookaround swaps make the
  absolute semantics come out right.
*/

use std::ops::Range;
use std::rc::Rc;

use bitvec::vec::BitVec;

use crate::character::{is_word, to_lower, Codepoint};
use crate::instruction::{CompiledOp, ANY_CHAR_CODE, LOOKAROUND_END, MATCHER_BASE_CODE};
use crate::limits::SEARCH_PREFIX_SIZE;
use crate::program::{CompiledRegex, MatchDirection};

/// Per-execution options.
#[derive(Copy, Clone, Default, Debug)]
pub struct ExecFlags {
  /// Find a match anywhere in the subject instead of requiring the whole
  /// subject to match.
  pub search: bool,
  /// The subject start is not a line start; `^` no longer holds there.
  pub not_beginning_of_line: bool,
  /// The subject end is not a line end; `$` no longer holds there.
  pub not_end_of_line: bool,
}

type Saves = Vec<Option<usize>>;

/// A successful execution: two byte offsets per capture slot pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Match {
  saves: Saves,
}

impl Match {
  /// The byte range of capture `index` (0 is the whole match), if it
  /// participated in the match.
  pub fn group(&self, index: usize) -> Option<Range<usize>> {
    let begin = self.saves.get(index * 2).copied().flatten()?;
    let end = self.saves.get(index * 2 + 1).copied().flatten()?;
    Some(begin..end)
  }

  /// The text of capture `index` within `subject`.
  pub fn group_str<'s>(&self, subject: &'s str, index: usize) -> Option<&'s str> {
    self.group(index).map(|range| &subject[range])
  }
}

pub struct ThreadedVm<'r> {
  program: &'r CompiledRegex,
}

impl<'r> ThreadedVm<'r> {
  pub fn new(program: &'r CompiledRegex) -> Self {
    ThreadedVm { program }
  }

  pub fn exec(&self, subject: &str, flags: ExecFlags) -> Option<Match> {
    Execution::new(self.program, subject, flags).run().map(|saves| Match { saves })
  }
}

#[derive(Clone)]
struct Thread {
  ip    : u32,
  saves : Rc<Saves>,
}

struct Execution<'r> {
  program : &'r CompiledRegex,
  chars   : Vec<Codepoint>, //< Subject codepoints in scan order
  cursors : Vec<usize>,     //< Byte offset at each scan position; len() == chars.len() + 1
  search  : bool,
  suppress_scan_begin : bool, //< Line-start assertions fail at the scan start edge
  suppress_scan_end   : bool,
}

impl<'r> Execution<'r> {
  fn new(program: &'r CompiledRegex, subject: &str, flags: ExecFlags) -> Self {
    let mut cursors: Vec<usize> = subject.char_indices().map(|(offset, _)| offset).collect();
    cursors.push(subject.len());
    let mut chars: Vec<Codepoint> = subject.chars().map(|c| c as Codepoint).collect();

    let backward = program.direction == MatchDirection::Backward;
    if backward {
      chars.reverse();
      cursors.reverse();
    }

    // The scan edges trade places under backward execution, and the edge
    // suppression flags with them.
    let (suppress_scan_begin, suppress_scan_end) = match backward {
      false => (flags.not_beginning_of_line, flags.not_end_of_line),
      true  => (flags.not_end_of_line, flags.not_beginning_of_line),
    };

    Execution {
      program,
      chars,
      cursors,
      search: flags.search,
      suppress_scan_begin,
      suppress_scan_end,
    }
  }

  fn run(&self) -> Option<Saves> {
    let scan_len = self.chars.len();
    let entry = match self.search {
      true  => 0,
      false => SEARCH_PREFIX_SIZE,
    };

    let mut current: Vec<Thread> = Vec::new();
    let mut next: Vec<Thread> = Vec::new();
    let mut visited = BitVec::<usize>::repeat(false, self.program.instructions.len());
    let mut best: Option<Saves> = None;

    let initial_saves = Rc::new(vec![None; self.program.save_count as usize]);
    self.add_thread(&mut current, &mut visited, entry, 0, initial_saves);

    for step in 0..=scan_len {
      let current_char = self.chars.get(step).copied();
      visited.fill(false);

      for thread in &current {
        let inst = self.program.instructions[thread.ip as usize];
        let consumed = match inst.op {
          CompiledOp::Literal => current_char == Some(inst.param),
          CompiledOp::LiteralIgnoreCase => current_char.map(to_lower) == Some(inst.param),
          CompiledOp::AnyChar => current_char.is_some(),
          CompiledOp::Matcher => match current_char {
            Some(cp) => self.program.matchers[inst.param as usize](cp),
            None => false,
          },
          CompiledOp::FindNextStart => current_char.is_some(),
          CompiledOp::Match => {
            if self.search || step == scan_len {
              best = Some((*thread.saves).clone());
              // Lower-priority threads can no longer improve the match.
              break;
            }
            false
          }
          // Zero-width instructions never appear in a thread list.
          _ => unreachable!("zero-width instruction scheduled as a thread"),
        };

        if consumed {
          self.add_thread(&mut next, &mut visited, thread.ip + 1, step + 1, thread.saves.clone());
        }
      }

      std::mem::swap(&mut current, &mut next);
      next.clear();

      if current.is_empty() {
        break;
      }
    }

    best
  }

  /**
    Adds the epsilon closure of `ip` to `list` for execution at scan
    position `step`, in priority order. `visited` suppresses duplicate
    instruction pointers within one list, which both preserves thread
    priority and terminates zero-width loops.
  */
  fn add_thread(
    &self,
    list: &mut Vec<Thread>,
    visited: &mut BitVec<usize>,
    ip: u32,
    step: usize,
    saves: Rc<Saves>,
  ) {
    if visited[ip as usize] {
      return;
    }
    visited.set(ip as usize, true);

    let inst = self.program.instructions[ip as usize];
    match inst.op {
      CompiledOp::Jump => {
        self.add_thread(list, visited, inst.param, step, saves);
      }

      CompiledOp::SplitPrioritizeParent => {
        if self.enter_allowed(ip, ip + 1, step) {
          self.add_thread(list, visited, ip + 1, step, saves.clone());
        }
        self.add_thread(list, visited, inst.param, step, saves);
      }

      CompiledOp::SplitPrioritizeChild => {
        if self.enter_allowed(ip, inst.param, step) {
          self.add_thread(list, visited, inst.param, step, saves.clone());
        }
        self.add_thread(list, visited, ip + 1, step, saves);
      }

      CompiledOp::Save => {
        let mut saves = saves;
        Rc::make_mut(&mut saves)[inst.param as usize] = Some(self.cursors[step]);
        self.add_thread(list, visited, ip + 1, step, saves);
      }

      CompiledOp::LineStart => {
        if self.at_line_start(step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::LineEnd => {
        if self.at_line_end(step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::WordBoundary => {
        if self.at_word_boundary(step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::NotWordBoundary => {
        if !self.at_word_boundary(step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::SubjectBegin => {
        if step == 0 {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::SubjectEnd => {
        if step == self.chars.len() {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      CompiledOp::LookAhead => {
        if self.lookaround(inst.param, true, false, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::LookAheadIgnoreCase => {
        if self.lookaround(inst.param, true, true, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::NegativeLookAhead => {
        if !self.lookaround(inst.param, true, false, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::NegativeLookAheadIgnoreCase => {
        if !self.lookaround(inst.param, true, true, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::LookBehind => {
        if self.lookaround(inst.param, false, false, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::LookBehindIgnoreCase => {
        if self.lookaround(inst.param, false, true, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::NegativeLookBehind => {
        if !self.lookaround(inst.param, false, false, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }
      CompiledOp::NegativeLookBehindIgnoreCase => {
        if !self.lookaround(inst.param, false, true, step) {
          self.add_thread(list, visited, ip + 1, step, saves);
        }
      }

      // Consuming instructions and Match wait in the list.
      CompiledOp::Literal
      | CompiledOp::LiteralIgnoreCase
      | CompiledOp::AnyChar
      | CompiledOp::Matcher
      | CompiledOp::FindNextStart
      | CompiledOp::Match => {
        list.push(Thread { ip, saves });
      }
    }
  }

  /**
    Whether a split branch may be taken. Only the two prefix splits are ever
    gated: the branch re-entering the pattern body consults the start-char
    oracle for the codepoint at the candidate position, which is how
    `FindNextStart` skips impossible starts.
  */
  fn enter_allowed(&self, ip: u32, target: u32, step: usize) -> bool {
    if ip >= SEARCH_PREFIX_SIZE || target != SEARCH_PREFIX_SIZE {
      return true;
    }
    match (&self.program.start_chars, self.chars.get(step)) {
      (Some(start_chars), Some(&cp)) => start_chars.may_start(cp),
      _ => true,
    }
  }

  fn at_line_start(&self, step: usize) -> bool {
    if step == 0 {
      return !self.suppress_scan_begin;
    }
    self.chars[step - 1] == '\n' as Codepoint
  }

  fn at_line_end(&self, step: usize) -> bool {
    if step == self.chars.len() {
      return !self.suppress_scan_end;
    }
    self.chars[step] == '\n' as Codepoint
  }

  /// The subject edges always count as word boundaries.
  fn at_word_boundary(&self, step: usize) -> bool {
    if step == 0 || step == self.chars.len() {
      return true;
    }
    is_word(self.chars[step - 1]) != is_word(self.chars[step])
  }

  /**
    Matches a lookaround body against the subject, scan-relative: `ahead`
    walks the unconsumed side starting at the cursor, behind walks the
    consumed side starting with the most recently consumed codepoint. The
    table is already oriented accordingly by the compiler.
  */
  fn lookaround(&self, table_offset: u32, ahead: bool, ignore_case: bool, step: usize) -> bool {
    let mut pos = step;
    for &code in &self.program.lookarounds[table_offset as usize..] {
      if code == LOOKAROUND_END {
        return true;
      }

      let cp = match ahead {
        true => {
          if pos >= self.chars.len() {
            return false;
          }
          let cp = self.chars[pos];
          pos += 1;
          cp
        }
        false => {
          if pos == 0 {
            return false;
          }
          pos -= 1;
          self.chars[pos]
        }
      };

      let matched = match code {
        ANY_CHAR_CODE => true,
        code if code >= MATCHER_BASE_CODE => {
          self.program.matchers[(code - MATCHER_BASE_CODE) as usize](cp)
        }
        code => {
          let cp = if ignore_case { to_lower(cp) } else { cp };
          cp == code
        }
      };
      if !matched {
        return false;
      }
    }
    true
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::compiler::compile;
  use crate::parser::Parser;
  use crate::program::CompileFlags;

  struct TestVm {
    program: CompiledRegex,
  }

  impl TestVm {
    fn new(pattern: &str) -> TestVm {
      TestVm::with_direction(pattern, MatchDirection::Forward)
    }

    fn backward(pattern: &str) -> TestVm {
      TestVm::with_direction(pattern, MatchDirection::Backward)
    }

    fn with_direction(pattern: &str, direction: MatchDirection) -> TestVm {
      let parsed = Parser::parse(pattern).unwrap();
      let program = compile(parsed, CompileFlags::default(), direction).unwrap();
      TestVm { program }
    }

    fn matches(&self, subject: &str) -> bool {
      ThreadedVm::new(&self.program).exec(subject, ExecFlags::default()).is_some()
    }

    fn exec(&self, subject: &str) -> Option<Match> {
      ThreadedVm::new(&self.program).exec(subject, ExecFlags::default())
    }

    fn search(&self, subject: &str) -> Option<Match> {
      let flags = ExecFlags { search: true, ..ExecFlags::default() };
      ThreadedVm::new(&self.program).exec(subject, flags)
    }
  }

  #[test]
  fn literal_star() {
    let vm = TestVm::new("a*b");
    assert!(vm.matches("b"));
    assert!(vm.matches("ab"));
    assert!(vm.matches("aaab"));
    assert!(!vm.matches("acb"));
    assert!(!vm.matches("abc"));
    assert!(!vm.matches(""));
  }

  #[test]
  fn anchors() {
    let vm = TestVm::new("^a.*b$");
    assert!(vm.matches("afoob"));
    assert!(vm.matches("ab"));
    assert!(!vm.matches("bab"));
    assert!(!vm.matches(""));
  }

  #[test]
  fn repeated_group_captures_last_iteration() {
    let vm = TestVm::new("^(foo|qux|baz)+(bar)?baz$");
    let subject = "fooquxbarbaz";
    let m = vm.exec(subject).unwrap();
    assert_eq!(m.group_str(subject, 1), Some("qux"));
    assert_eq!(m.group_str(subject, 2), Some("bar"));
    assert!(!vm.matches("fooquxbarbaze"));
    assert!(!vm.matches("quxbar"));
    assert!(!vm.matches("blahblah"));
    assert!(vm.matches("bazbaz"));
    assert!(vm.matches("quxbaz"));
  }

  #[test]
  fn word_boundaries() {
    let vm = TestVm::new(r".*\b(foo|bar)\b.*");
    let subject = "qux foo baz";
    let m = vm.exec(subject).unwrap();
    assert_eq!(m.group_str(subject, 1), Some("foo"));
    assert!(!vm.matches("quxfoobaz"));
    assert!(vm.matches("bar"));
    assert!(!vm.matches("foobar"));
  }

  #[test]
  fn bare_alternation() {
    let vm = TestVm::new("(foo|bar)");
    assert!(vm.matches("foo"));
    assert!(vm.matches("bar"));
    assert!(!vm.matches("foobar"));
  }

  #[test]
  fn bounded_repeat() {
    let vm = TestVm::new("a{3,5}b");
    assert!(!vm.matches("aab"));
    assert!(vm.matches("aaab"));
    assert!(vm.matches("aaaaab"));
    assert!(!vm.matches("aaaaaab"));
  }

  #[test]
  fn exact_repeat() {
    let vm = TestVm::new("a{3}b");
    assert!(!vm.matches("aab"));
    assert!(vm.matches("aaab"));
    assert!(!vm.matches("aaaab"));
  }

  #[test]
  fn open_ended_repeat() {
    let vm = TestVm::new("a{3,}b");
    assert!(!vm.matches("aab"));
    assert!(vm.matches("aaab"));
    assert!(vm.matches("aaaaab"));
  }

  #[test]
  fn upper_bounded_repeat() {
    let vm = TestVm::new("a{,3}b");
    assert!(vm.matches("b"));
    assert!(vm.matches("ab"));
    assert!(vm.matches("aaab"));
    assert!(!vm.matches("aaaab"));
  }

  #[test]
  fn greedy_captures() {
    let vm = TestVm::new("f.*a(.*o)");
    let subject = "blahfoobarfoobaz";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("foobarfoo"));
    assert_eq!(m.group_str(subject, 1), Some("rfoo"));

    let subject = "mais que fais la police";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("fais la po"));
    assert_eq!(m.group_str(subject, 1), Some(" po"));
  }

  #[test]
  fn class_with_ranges_and_dash() {
    let vm = TestVm::new("[àb-dX-Z-]{3,5}");
    assert!(vm.matches("cà-Y"));
    assert!(!vm.matches("àeY"));
    assert!(vm.matches("dcbàX"));
    assert!(!vm.matches("efg"));
  }

  #[test]
  fn greedy_bounded_group() {
    let vm = TestVm::new("(a{3,5})a+");
    let m = vm.exec("aaaaaa").unwrap();
    assert_eq!(m.group_str("aaaaaa", 1), Some("aaaaa"));
  }

  #[test]
  fn reluctant_bounded_group() {
    let vm = TestVm::new("(a{3,5}?)a+");
    let m = vm.exec("aaaaaa").unwrap();
    assert_eq!(m.group_str("aaaaaa", 1), Some("aaa"));

    let vm = TestVm::new("(a{3,5}?)a");
    assert!(vm.matches("aaaa"));
  }

  #[test]
  fn digit_class_escape() {
    let vm = TestVm::new(r"\d{3}");
    assert!(vm.matches("123"));
    assert!(!vm.matches("1x3"));
  }

  #[test]
  fn class_mixing_dash_and_escape() {
    let vm = TestVm::new(r"[-\d]+");
    assert!(vm.matches("123-456"));
    assert!(!vm.matches("123_456"));
  }

  #[test]
  fn negated_horizontal_space_in_class() {
    let vm = TestVm::new(r"[ \H]+");
    assert!(vm.matches("abc "));
    assert!(!vm.matches("a \t"));
  }

  #[test]
  fn quoted_run() {
    let vm = TestVm::new(r"\Q{}[]*+?\Ea+");
    assert!(vm.matches("{}[]*+?aa"));

    let vm = TestVm::new(r"\Q...");
    assert!(vm.matches("..."));
    assert!(!vm.matches("bla"));
  }

  #[test]
  fn reset_start() {
    let vm = TestVm::new(r"foo\Kbar");
    let subject = "foobar";
    let m = vm.exec(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("bar"));
    assert!(!vm.matches("bar"));

    // Under search the whole-match slice still starts at `bar`.
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group(0), Some(3..6));
  }

  #[test]
  fn reluctant_group_captures_minimum() {
    let vm = TestVm::new("(fo+?).*");
    let m = vm.exec("foooo").unwrap();
    assert_eq!(m.group_str("foooo", 1), Some("fo"));
  }

  #[test]
  fn lookahead() {
    let vm = TestVm::new("(?=foo).");
    let subject = "barfoo";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("f"));

    let vm = TestVm::new("(?!f[oa]o)...");
    assert!(!vm.matches("foo"));
    assert!(vm.matches("qux"));
  }

  #[test]
  fn lookbehind() {
    let vm = TestVm::new("(?<!f).");
    assert!(vm.matches("f"));

    let vm = TestVm::new("...(?<=f.o)");
    assert!(vm.matches("foo"));
    assert!(!vm.matches("qux"));

    let vm = TestVm::new("...(?<!foo)");
    assert!(!vm.matches("foo"));
    assert!(vm.matches("qux"));
  }

  #[test]
  fn mid_pattern_case_modifier() {
    let vm = TestVm::new("Foo(?i)f[oB]+");
    assert!(vm.matches("FooFOoBb"));
  }

  #[test]
  fn negated_classes() {
    let vm = TestVm::new(r"[^\]]+");
    assert!(!vm.matches("a]c"));
    assert!(vm.matches("abc"));

    let vm = TestVm::new(r"[^:\n]+");
    assert!(!vm.matches("\nbc"));
    assert!(vm.matches("abc"));
  }

  #[test]
  fn non_capturing_group() {
    let vm = TestVm::new("(?:foo)+");
    assert!(vm.matches("foofoofoo"));
    assert!(!vm.matches("barbarbar"));
  }

  #[test]
  fn quote_detection() {
    let vm = TestVm::new(r#"(?<!\\)(?:\\\\)*""#);
    assert!(vm.search("foo\"").is_some());
  }

  #[test]
  fn line_end_before_newline() {
    let vm = TestVm::new("$");
    let m = vm.search("foo\n").unwrap();
    assert_eq!(m.group(0), Some(3..3));
  }

  #[test]
  fn backward_search_finds_rightmost() {
    let vm = TestVm::backward("fo{1,}");
    let subject = "foo1fooo2";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group(0), Some(4..8));
    assert_eq!(m.group_str(subject, 0), Some("fooo"));
  }

  #[test]
  fn backward_search_with_lookarounds() {
    let vm = TestVm::backward("(?<=f)oo(b[ae]r)?(?=baz)");
    let subject = "foobarbazfoobazfooberbaz";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("oober"));
    assert_eq!(m.group_str(subject, 1), Some("ber"));
  }

  #[test]
  fn backward_search_with_negative_lookbehind() {
    let vm = TestVm::backward("(baz|boz|foo|qux)(?<!baz)(?<!o)");
    let subject = "quxbozfoobaz";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("boz"));
  }

  #[test]
  fn backward_search_literal() {
    let vm = TestVm::backward("foo");
    let m = vm.search("foofoo").unwrap();
    assert_eq!(m.group(0), Some(3..6));
  }

  #[test]
  fn backward_line_end_with_suppressed_subject_end() {
    let vm = TestVm::backward("$");
    let flags = ExecFlags { search: true, not_end_of_line: true, ..ExecFlags::default() };
    let m = ThreadedVm::new(&vm.program).exec("foo\nbar\nbaz\nqux", flags).unwrap();
    assert_eq!(m.group(0), Some(11..11));
  }

  #[test]
  fn empty_repeat_terminates() {
    let vm = TestVm::new("()*");
    assert!(!vm.matches(" "));
  }

  #[test]
  fn word_boundary_at_subject_edges() {
    let vm = TestVm::new(r"\b(?<!-)(a|b|)(?!-)\b");
    let m = vm.search("# foo bar").unwrap();
    assert_eq!(m.group(0), Some(0..0));
  }

  #[test]
  fn empty_lookahead() {
    let vm = TestVm::new("(?=)");
    assert!(vm.matches(""));
  }

  #[test]
  fn case_insensitive_search() {
    let vm = TestVm::new("(?i)FOO");
    assert!(vm.search("foo").is_some());
  }

  #[test]
  fn optional_atom_before_lookahead() {
    let vm = TestVm::new(".?(?=foo)");
    let subject = "afoo";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group_str(subject, 0), Some("a"));
  }

  #[test]
  fn case_insensitive_lookahead() {
    let vm = TestVm::new("(?i)(?=Foo)");
    let m = vm.search("fOO").unwrap();
    assert_eq!(m.group(0), Some(0..0));
  }

  #[test]
  fn overlapping_ranges_in_class() {
    let vm = TestVm::new("[d-ea-dcf-k]+");
    assert!(vm.matches("abcde"));
  }

  #[test]
  fn non_ascii_literal() {
    let vm = TestVm::new("д");
    assert!(vm.search("д").is_some());
  }

  #[test]
  fn numeric_escapes() {
    let vm = TestVm::new("\\0\\x0A\\u260e\\u260F");
    assert!(vm.matches("\0\n☎☏"));
    assert!(!vm.matches("\0\n☎x"));
  }

  #[test]
  fn search_prefers_leftmost_match() {
    let vm = TestVm::new("o+");
    let subject = "fooboo";
    let m = vm.search(subject).unwrap();
    assert_eq!(m.group(0), Some(1..3));
  }

  #[test]
  fn search_with_oracle_skips_ahead() {
    // `z*x` keeps an oracle of {z, x}; the match sits past unrelated text.
    let vm = TestVm::new("z*xy");
    assert!(vm.program.start_chars.is_some());
    let m = vm.search("aaaaaazzxy").unwrap();
    assert_eq!(m.group(0), Some(6..10));
  }

  #[test]
  fn anchored_exec_requires_full_consumption() {
    let vm = TestVm::new("foo");
    assert!(vm.matches("foo"));
    assert!(vm.exec("fooo").is_none());
    assert!(vm.search("fooo").is_some());
  }

  #[test]
  fn line_start_suppression_flag() {
    let vm = TestVm::new("^foo");
    let flags = ExecFlags { not_beginning_of_line: true, ..ExecFlags::default() };
    assert!(ThreadedVm::new(&vm.program).exec("foo", flags).is_none());
    assert!(vm.matches("foo"));
  }
}
