use crate::dnf::{Clause, ClauseSet, Dnf, and, or};
use crate::error::FilterError;
use tracing::trace;

/// Parses `input` into disjunctive normal form.
///
/// # Errors
/// Returns every [`FilterError`] found. Malformed items and negations are skipped so that
/// later problems are still reported; unbalanced parentheses stop the scan.
pub fn parse(input: &str) -> Result<Vec<ClauseSet>, Vec<FilterError>> {
    let mut parser = Parser { input, pos: 0, errors: Vec::new(), fatal: false };

    parser.skip_ws();
    if parser.at_end() {
        return Err(vec![FilterError::malformed(0, "empty filter")]);
    }

    let dnf = parser.filter();
    if !parser.fatal {
        parser.skip_ws();
        if !parser.at_end() {
            parser.errors.push(FilterError::Trailing { position: parser.pos, context: None });
        }
    }

    match dnf {
        Some(dnf) if parser.errors.is_empty() => {
            trace!(input, clause_sets = dnf.len(), "Filter parsed");
            Ok(dnf)
        },
        _ => Err(parser.errors),
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    errors: Vec<FilterError>,
    fatal: bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn unbalanced(&mut self, position: usize) {
        self.errors.push(FilterError::Unbalanced { position, context: None });
        self.fatal = true;
    }

    /// `None` means this sub-filter contributed an error; check `fatal` before going on.
    fn filter(&mut self) -> Option<Dnf> {
        let open = self.pos;
        if self.peek() != Some(b'(') {
            self.errors.push(FilterError::malformed(open, "expected '('"));
            self.skip_item(open);
            return None;
        }
        self.pos += 1;
        self.skip_ws();

        match self.peek() {
            Some(op @ (b'&' | b'|')) => {
                self.pos += 1;
                self.composite(open, op)
            },
            Some(b'!') => {
                self.errors.push(FilterError::Negation { position: self.pos, context: None });
                self.skip_to_close(open);
                None
            },
            Some(_) => self.item(open),
            None => {
                self.unbalanced(open);
                None
            },
        }
    }

    fn composite(&mut self, open: usize, op: u8) -> Option<Dnf> {
        let mut children = Vec::new();
        let mut failed = false;

        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'(') => match self.filter() {
                    Some(child) => children.push(child),
                    None if self.fatal => return None,
                    None => failed = true,
                },
                Some(b')') => {
                    self.pos += 1;
                    break;
                },
                Some(_) => {
                    self.errors.push(FilterError::malformed(self.pos, "expected '(' or ')'"));
                    self.skip_to_close(open);
                    return None;
                },
                None => {
                    self.unbalanced(open);
                    return None;
                },
            }
        }

        if children.is_empty() && !failed {
            self.errors.push(FilterError::malformed(open, "empty composite"));
            return None;
        }
        if failed {
            return None;
        }

        Some(if op == b'&' { and(children) } else { or(children) })
    }

    /// `attr=value)` with the opening parenthesis already consumed.
    fn item(&mut self, open: usize) -> Option<Dnf> {
        let start = self.pos;
        let mut escaped = false;
        let mut nested = false;

        loop {
            match self.peek() {
                None => {
                    self.unbalanced(open);
                    return None;
                },
                Some(_) if escaped => escaped = false,
                Some(b'\\') => escaped = true,
                Some(b'(') => nested = true,
                Some(b')') => break,
                Some(_) => {},
            }
            self.pos += 1;
        }

        let text = &self.input[start..self.pos];
        self.pos += 1;

        if nested {
            self.errors.push(FilterError::malformed(start, "unescaped '(' in clause"));
            return None;
        }
        let Some((attribute, value)) = text.split_once('=') else {
            self.errors.push(FilterError::malformed(start, "clause has no '='"));
            return None;
        };
        let attribute = attribute.trim();
        if attribute.is_empty() {
            self.errors.push(FilterError::malformed(start, "clause has no attribute"));
            return None;
        }
        if attribute.ends_with(['<', '>', '~']) {
            self.errors.push(FilterError::malformed(start, "only '=' comparisons are supported"));
            return None;
        }

        let clause = Clause { attribute: attribute.to_owned(), value: unescape(value.trim()) };
        Some(vec![ClauseSet::from([clause])])
    }

    /// Moves past the parenthesis matching the one at `open`.
    fn skip_to_close(&mut self, open: usize) {
        let mut depth = 0usize;
        let mut escaped = false;
        let mut pos = open;

        while let Some(&b) = self.input.as_bytes().get(pos) {
            pos += 1;
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos = pos;
                        return;
                    }
                },
                _ => {},
            }
        }
        self.unbalanced(open);
    }

    /// Recovers from junk where a filter was expected by jumping to the next `(` or `)`.
    fn skip_item(&mut self, from: usize) {
        let rest = &self.input.as_bytes()[from..];
        match rest.iter().skip(1).position(|b| matches!(b, b'(' | b')')) {
            Some(offset) => self.pos = from + 1 + offset,
            None => self.pos = self.input.len(),
        }
    }
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(attribute: &str, value: &str) -> Clause {
        Clause { attribute: attribute.to_owned(), value: value.to_owned() }
    }

    #[test]
    fn single_item() {
        let dnf = parse("(a=b)").unwrap();
        assert_eq!(dnf, vec![ClauseSet::from([clause("a", "b")])]);
    }

    #[test]
    fn and_of_ors_distributes() {
        let dnf = parse("(&(x=1)(|(a=a)(b=b)))").unwrap();
        assert_eq!(
            dnf,
            vec![
                ClauseSet::from([clause("x", "1"), clause("a", "a")]),
                ClauseSet::from([clause("x", "1"), clause("b", "b")]),
            ]
        );
    }

    #[test]
    fn whitespace_and_escapes() {
        let dnf = parse("  ( & (a = x\\)y) ( b=c ) )  ").unwrap();
        assert_eq!(dnf, vec![ClauseSet::from([clause("a", "x)y"), clause("b", "c")])]);
    }

    #[test]
    fn negation_is_reported_with_position() {
        let errors = parse("(&(a=b)(!(c=d)))").unwrap_err();
        assert_eq!(errors, vec![FilterError::Negation { position: 8, context: None }]);
    }

    #[test]
    fn errors_are_collected() {
        let errors = parse("(|(!(a=b))(novalue)(c>=1))").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], FilterError::Negation { position: 3, .. }));
        assert!(matches!(errors[1], FilterError::Malformed { position: 11, .. }));
        assert!(matches!(errors[2], FilterError::Malformed { position: 20, .. }));
    }

    #[test]
    fn unbalanced_stops_the_scan() {
        let errors = parse("(&(a=b)(c=d)").unwrap_err();
        assert_eq!(errors, vec![FilterError::Unbalanced { position: 0, context: None }]);
    }

    #[test]
    fn trailing_input() {
        let errors = parse("(a=b) (c=d)").unwrap_err();
        assert_eq!(errors, vec![FilterError::Trailing { position: 6, context: None }]);
    }

    #[test]
    fn empty_input_and_empty_composite() {
        assert!(matches!(parse("   ").unwrap_err()[0], FilterError::Malformed { position: 0, .. }));
        assert!(matches!(parse("(&)").unwrap_err()[0], FilterError::Malformed { position: 0, .. }));
    }
}
