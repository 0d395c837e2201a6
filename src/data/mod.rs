/// Core algorithms, independent of any host.
///
/// Architecture:
/// ```text
///  file.spa ──► ┌──────┐
///               │ spa  │  fixed-offset header, flag scan → SpaRecord
///               └──────┘
///
///  patterns ──► ┌────────┐
///  universe     │ expand │  glob expansion, then cycling pairs → PairStream
///               └────────┘
///
///  xs, ys  ──► ┌──────┐
///              │ fit  │  linear / polynomial least squares → coefficients
///              └──────┘
/// ```

pub mod expand;
pub mod fit;
pub mod spa;
