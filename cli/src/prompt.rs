use std::io::{self, BufRead, Write};

/// Ask a yes/no question. Only an explicit "y" or "yes" confirms; EOF declines.
pub fn confirm<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
