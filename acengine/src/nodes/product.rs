/// # ProductCache
/// Running products of a product gate's children, taken from the left
/// (`prefix`) and from the right (`suffix`). Both sequences have `k + 1`
/// entries and start at 1, so the product of every child except the one at
/// position `p` is `prefix[p] * suffix[k - 1 - p]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCache {
    prefix: Vec<f64>,
    suffix: Vec<f64>,
}

impl ProductCache {
    pub fn new(values: &[f64]) -> Self {
        let k = values.len();
        let mut prefix = Vec::with_capacity(k + 1);
        let mut suffix = Vec::with_capacity(k + 1);
        prefix.push(1.0);
        suffix.push(1.0);
        for i in 1..=k {
            prefix.push(prefix[i - 1] * values[i - 1]);
            suffix.push(suffix[i - 1] * values[k - i]);
        }
        ProductCache { prefix, suffix }
    }

    pub fn arity(&self) -> usize {
        self.prefix.len() - 1
    }

    /// Product of all children, `prefix[k]`.
    pub fn product(&self) -> f64 {
        self.prefix[self.arity()]
    }

    pub fn prefix(&self) -> &[f64] {
        &self.prefix
    }

    pub fn suffix(&self) -> &[f64] {
        &self.suffix
    }

    /// Product of every child except the occurrence at zero-based `position`.
    #[inline]
    pub fn except(&self, position: usize) -> f64 {
        let k = self.arity();
        debug_assert!(position < k);
        self.prefix[position] * self.suffix[k - 1 - position]
    }
}

/// Zero bookkeeping for the flag-based product rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroFlag {
    /// Exactly one child occurrence is zero.
    pub single_zero: bool,
    /// Product of the nonzero children; only meaningful when `single_zero` is set.
    pub nonzero_product: f64,
}

/// Per-gate state left behind by the forward pass of a product gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProductState {
    #[default]
    Pending,
    Cache(ProductCache),
    Flag(ZeroFlag),
}

impl ProductState {
    pub fn cache(&self) -> Option<&ProductCache> {
        match self {
            ProductState::Cache(cache) => Some(cache),
            _ => None,
        }
    }

    pub fn flag(&self) -> Option<&ZeroFlag> {
        match self {
            ProductState::Flag(flag) => Some(flag),
            _ => None,
        }
    }
}
