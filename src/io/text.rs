//! Plain-text instance format.
//!
//! ```text
//! R=3
//! Pi=(2,3,1)
//! A=
//! 1,3,5
//! Sij=
//! 0,1,2
//! 1,0,1
//! 2,1,0
//! ```
//!
//! `R` is the number of jobs, `Pi` the processing times, each line of the
//! `A` section a precedence `i,j,d` with 1-based job ids, and `Sij` the
//! `R x R` setup matrix, one row per line. Blank lines are ignored.

use std::path::Path;
use std::str::FromStr;

use crate::models::{Instance, InstanceError, NO_DELAY};

/// Non-blank lines with their 1-based line numbers.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn next_content(&mut self) -> Option<(usize, &'a str)> {
        for (idx, raw) in self.inner.by_ref() {
            self.last = idx + 1;
            let line = raw.trim();
            if !line.is_empty() {
                return Some((idx + 1, line));
            }
        }
        None
    }

    fn require(&mut self, what: &str) -> Result<(usize, &'a str), InstanceError> {
        self.next_content().ok_or_else(|| {
            parse_error(
                self.last + 1,
                format!("unexpected end of input, expected {what}"),
            )
        })
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> InstanceError {
    InstanceError::Parse {
        line,
        message: message.into(),
    }
}

/// Splits `key=value`, checking the key against `keys`.
fn keyed<'a>(line_no: usize, line: &'a str, keys: &[&str]) -> Result<&'a str, InstanceError> {
    match line.split_once('=') {
        Some((key, value)) if keys.contains(&key.trim()) => Ok(value.trim()),
        _ => Err(parse_error(
            line_no,
            format!("expected `{}=`, found `{line}`", keys[0]),
        )),
    }
}

fn number<T: FromStr>(line_no: usize, token: &str, what: &str) -> Result<T, InstanceError> {
    let token = token.trim();
    token
        .parse()
        .map_err(|_| parse_error(line_no, format!("invalid {what} `{token}`")))
}

fn row(line_no: usize, line: &str, n: usize, what: &str) -> Result<Vec<f64>, InstanceError> {
    let values = line
        .split(',')
        .map(|token| number::<f64>(line_no, token, what))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() != n {
        return Err(parse_error(
            line_no,
            format!("expected {n} {what} values, found {}", values.len()),
        ));
    }
    Ok(values)
}

/// 1-based job id to index.
fn job_index(line_no: usize, token: &str, n: usize) -> Result<usize, InstanceError> {
    let id: usize = number(line_no, token, "job id")?;
    if id == 0 || id > n {
        return Err(parse_error(
            line_no,
            format!("job id {id} outside 1..={n}"),
        ));
    }
    Ok(id - 1)
}

/// Parses an instance from the text format.
///
/// # Errors
///
/// [`InstanceError::Parse`] with the offending line for malformed text, or
/// any shape error raised by [`Instance::from_rows`].
///
/// # Examples
///
/// ```
/// use u_sequencing::io::parse_instance;
///
/// let text = "R=2\nPi=(1,1)\nA=\n1,2,5\nSij=\n0,0\n0,0\n";
/// let inst = parse_instance(text).unwrap();
/// assert_eq!(inst.n(), 2);
/// assert_eq!(inst.delay(0, 1), Some(5.0));
/// ```
pub fn parse_instance(text: &str) -> Result<Instance, InstanceError> {
    let mut lines = Lines::new(text);

    let (line_no, line) = lines.require("`R=`")?;
    let n: usize = number(line_no, keyed(line_no, line, &["R"])?, "job count")?;

    let (line_no, line) = lines.require("`Pi=`")?;
    let values = keyed(line_no, line, &["Pi", "Pj"])?;
    let values = values.trim_start_matches('(').trim_end_matches(')');
    let processing = row(line_no, values, n, "processing")?;

    let (line_no, line) = lines.require("`A=`")?;
    if !keyed(line_no, line, &["A"])?.is_empty() {
        return Err(parse_error(line_no, "`A=` must stand on its own line"));
    }

    let mut delay = vec![vec![NO_DELAY; n]; n];
    loop {
        let (line_no, line) = lines.require("`Sij=`")?;
        if line.starts_with("Sij") {
            if !keyed(line_no, line, &["Sij"])?.is_empty() {
                return Err(parse_error(line_no, "`Sij=` must stand on its own line"));
            }
            break;
        }
        let parts: Vec<&str> = line.split(',').collect();
        let [i, j, d] = parts.as_slice() else {
            return Err(parse_error(
                line_no,
                format!("expected `i,j,d`, found `{line}`"),
            ));
        };
        let from = job_index(line_no, i, n)?;
        let to = job_index(line_no, j, n)?;
        delay[from][to] = number(line_no, d, "delay")?;
    }

    let mut setup = Vec::with_capacity(n);
    for _ in 0..n {
        let (line_no, line) = lines.require("a setup row")?;
        setup.push(row(line_no, line, n, "setup")?);
    }

    if let Some((line_no, line)) = lines.next_content() {
        return Err(parse_error(
            line_no,
            format!("unexpected trailing content `{line}`"),
        ));
    }

    Instance::from_rows(processing, setup, delay)
}

/// Reads and parses an instance file.
///
/// # Errors
///
/// [`InstanceError::Io`] if the file cannot be read, otherwise as
/// [`parse_instance`].
pub fn load_instance<P: AsRef<Path>>(path: P) -> Result<Instance, InstanceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| InstanceError::Io(format!("{}: {e}", path.display())))?;
    parse_instance(&text)
}
