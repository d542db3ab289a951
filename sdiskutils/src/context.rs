/// Enumerated generation contexts
/// Generally used for error reporting
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorContext {
    /// Parameter validation
    Params,
    Ring,
    Cell(String),
    /// Writing of output file, by path
    Export(String),
}
