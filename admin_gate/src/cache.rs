//! Cache-Control policy selector
//!
//! Pure mapping from a response class to the header value. Every terminal
//! response produced by the gate must carry exactly one of these classes.

/// Cache lifetime class of a gate response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheClass {
    /// Shareable but always revalidated.
    Public,
    /// Shareable for one hour.
    Hour,
    /// Permanent mappings such as the legacy aliases.
    Year,
    /// Session-sensitive markup. The directive covers both old and modern
    /// cache implementations.
    Private,
}

impl CacheClass {
    pub fn header_value(self) -> &'static str {
        match self {
            CacheClass::Public => "public, max-age=0",
            CacheClass::Hour => "public, max-age=3600",
            CacheClass::Year => "public, max-age=31536000",
            CacheClass::Private => {
                "no-cache, private, no-store, must-revalidate, max-stale=0, post-check=0, pre-check=0"
            }
        }
    }
}
