/**
  Constants specifying hard limits of the compilation pipeline.
*/

/// Max number of AST nodes a pattern may parse to. Node indices are 16 bits.
pub const MAX_AST_NODES: usize = u16::MAX as usize;

/// Max number of bytecode instructions a pattern may compile to.
pub const MAX_INSTRUCTIONS: usize = u16::MAX as usize;

/// Max value of an explicit quantifier bound, e.g. the 5 in `a{3,5}`.
pub const MAX_QUANTIFIER_BOUND: i32 = 1000;

/// Number of instructions in the search prefix every program starts with.
pub const SEARCH_PREFIX_SIZE: u32 = 3;
