use structopt::StructOpt;

use recurve::{compile_regex, CompileFlags, ExecFlags, MatchDirection, ThreadedVm};

#[derive(StructOpt)]
#[structopt(name = "recurve", about = "Compile a regex to bytecode and run it.")]
struct Options {
  /// Print the compiled program before matching.
  #[structopt(short, long)]
  dump: bool,

  /// Compile for right-to-left evaluation.
  #[structopt(short, long)]
  backward: bool,

  /// Search for the pattern anywhere in each subject instead of matching
  /// the whole subject.
  #[structopt(short, long)]
  search: bool,

  /// Do not record captures other than the whole match.
  #[structopt(long)]
  no_subs: bool,

  /// The pattern to compile.
  pattern: String,

  /// Subjects to match against.
  subjects: Vec<String>,
}

fn main() {
  env_logger::init();
  let options = Options::from_args();

  let direction = match options.backward {
    true  => MatchDirection::Backward,
    false => MatchDirection::Forward,
  };

  let program = match compile_regex(
    &options.pattern,
    CompileFlags { no_subs: options.no_subs },
    direction,
  ) {
    Ok(program) => program,
    Err(error) => {
      eprintln!("{}", error);
      std::process::exit(1);
    }
  };

  if options.dump {
    print!("{}", program);
  }

  let vm = ThreadedVm::new(&program);
  let flags = ExecFlags { search: options.search, ..ExecFlags::default() };

  for subject in &options.subjects {
    match vm.exec(subject, flags) {
      Some(found) => {
        println!("{}: match", subject);
        for index in 0..(program.save_count / 2) as usize {
          if let Some(range) = found.group(index) {
            println!(
              "  capture {}: {:?} at {}..{}",
              index,
              &subject[range.clone()],
              range.start,
              range.end
            );
          }
        }
      }
      None => println!("{}: no match", subject),
    }
  }
}
