/// Resource limits to prevent abuse and keep evaluation predictable
///
/// Both limits are generous enough for any hand-written formula; they exist so
/// that generated or hostile input cannot exhaust memory or the call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Maximum expression length in characters
    /// Real usage: ~100 chars, Limit: 64K
    pub max_expression_length: usize,

    /// Maximum combined nesting of parentheses and conditionals
    /// Real usage: ~5 levels, Limit: 128
    /// Branch evaluation recurses once per conditional level, so this also
    /// bounds evaluator stack depth
    pub max_nesting_depth: usize,

    /// Maximum depth of the operand tree, counting operators and calls
    /// Real usage: ~10 levels, Limit: 512
    /// Operator chains such as `1 + 1 + ... + 1` nest one level per operator
    /// without any parentheses; the expression tree and its serialization
    /// recurse once per level
    pub max_tree_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_expression_length: 64 * 1024,
            max_nesting_depth: 128,
            max_tree_depth: 512,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
