/// Wallace-rule melting temperature estimate: 4 °C per G/C, 2 °C per A/T.
///
/// Good enough for ranking junction windows during segmentation; anything
/// needing salt or nearest-neighbor corrections should not use this.
pub fn wallace_tm(window: &[u8]) -> f64 {
    let gc = window
        .iter()
        .map(|b| b.to_ascii_uppercase())
        .filter(|&b| b == b'G' || b == b'C')
        .count();
    let at = window.len() - gc;
    (4 * gc + 2 * at) as f64
}
