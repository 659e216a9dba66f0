/// Draw a spin grid with one arrow per spin: `↑` for +1, `↓` for -1.
///
/// Every row is followed by a newline and a blank line.
pub fn render_grid(grid: &[Vec<i8>]) -> String {
    let mut out = String::new();
    for row in grid {
        for &s in row {
            out.push_str(if s == 1 { "↑ " } else { "↓ " });
        }
        out.push_str("\n\n");
    }
    out
}
