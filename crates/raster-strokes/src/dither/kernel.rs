//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; a neighbor receives
/// `error * weight / divisor`. `dx` is for a left-to-right row and is
/// negated on rows scanned right to left.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub entries: &'static [(i32, i32, u8)],
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error handed to each neighbor, in kernel order.
    pub fn fractions(&self) -> impl Iterator<Item = (i32, i32, f64)> + '_ {
        let divisor = self.divisor as f64;
        self.entries
            .iter()
            .map(move |&(dx, dy, w)| (dx, dy, w as f64 / divisor))
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};
