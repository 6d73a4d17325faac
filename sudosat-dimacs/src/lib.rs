//! DIMACS CNF parser and writer for the sudosat SAT solver.
//!
//! The parser is line oriented: `c` lines are comments, an optional `p cnf <vars> <clauses>`
//! header declares sizes, and every other non-blank line is one clause given as
//! whitespace-separated non-zero integers terminated by `0`. The declared clause count is
//! advisory and never checked; the declared variable count is merged with the largest literal
//! actually observed, so headerless input (such as a concatenated rules and puzzle file) parses
//! fine.

use std::borrow::Borrow;
use std::io;

use sudosat_formula::{CnfFormula, Lit};

use anyhow::Error;
use thiserror::Error;

/// Possible errors while parsing a DIMACS CNF formula.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("line {}: invalid literal: '{}'", line, token)]
    InvalidLiteral { line: usize, token: String },
    #[error("line {}: clause not terminated by 0", line)]
    UnterminatedClause { line: usize },
    #[error("line {}: literals after terminating 0", line)]
    TrailingLiterals { line: usize },
    #[error("line {}: invalid header syntax: {}", line, header)]
    InvalidHeader { line: usize, header: String },
    #[error("line {}: duplicate header", line)]
    DuplicateHeader { line: usize },
}

/// Variable and clause count of a DIMACS CNF header.
#[derive(Copy, Clone, Debug)]
pub struct DimacsHeader {
    pub var_count: usize,
    pub clause_count: usize,
}

/// Parse DIMACS CNF input into a [`CnfFormula`].
///
/// The variable count of the returned formula is the maximum of the header's declared count (if
/// a header is present) and the largest variable observed in a clause.
pub fn parse_dimacs(input: impl io::Read) -> Result<CnfFormula, Error> {
    use io::BufRead;

    let mut formula = CnfFormula::new();
    let mut header: Option<DimacsHeader> = None;
    let mut clause = Vec::new();

    for (number, line) in io::BufReader::new(input).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        let line_number = number + 1;

        if line.is_empty() || line.starts_with('c') {
            continue;
        }

        if line.starts_with('p') {
            if header.is_some() {
                return Err(ParserError::DuplicateHeader { line: line_number }.into());
            }
            let parsed = parse_header(line, line_number)?;
            formula.set_var_count(parsed.var_count);
            header = Some(parsed);
            continue;
        }

        clause.clear();
        let mut terminated = false;
        for token in line.split_whitespace() {
            if terminated {
                return Err(ParserError::TrailingLiterals { line: line_number }.into());
            }
            let literal: isize =
                token
                    .parse()
                    .map_err(|_| ParserError::InvalidLiteral {
                        line: line_number,
                        token: token.into(),
                    })?;
            if literal == 0 {
                terminated = true;
            } else {
                clause.push(Lit::from_dimacs(literal));
            }
        }
        if !terminated {
            return Err(ParserError::UnterminatedClause { line: line_number }.into());
        }
        formula.add_clause(&clause);
    }

    Ok(formula)
}

fn parse_header(line: &str, line_number: usize) -> Result<DimacsHeader, ParserError> {
    let invalid = || ParserError::InvalidHeader {
        line: line_number,
        header: line.into(),
    };

    let mut fields = line.split_whitespace();
    if fields.next() != Some("p") || fields.next() != Some("cnf") {
        return Err(invalid());
    }

    let var_count: usize = fields
        .next()
        .and_then(|value| value.parse().ok())
        .ok_or_else(invalid)?;
    let clause_count: usize = fields
        .next()
        .and_then(|value| value.parse().ok())
        .ok_or_else(invalid)?;

    if fields.next().is_some() {
        return Err(invalid());
    }

    Ok(DimacsHeader {
        var_count,
        clause_count,
    })
}

/// Write a DIMACS CNF header.
pub fn write_dimacs_header(target: &mut impl io::Write, header: DimacsHeader) -> io::Result<()> {
    writeln!(
        target,
        "p cnf {var_count} {clause_count}",
        var_count = header.var_count,
        clause_count = header.clause_count
    )
}

/// Write an iterator of clauses as headerless DIMACS CNF.
pub fn write_dimacs_clauses(
    target: &mut impl io::Write,
    clauses: impl IntoIterator<Item = impl IntoIterator<Item = impl Borrow<Lit>>>,
) -> io::Result<()> {
    for clause in clauses.into_iter() {
        for lit in clause.into_iter() {
            itoa::write(&mut *target, lit.borrow().to_dimacs())?;
            target.write_all(b" ")?;
        }
        target.write_all(b"0\n")?;
    }
    Ok(())
}

/// Write a formula as DIMACS CNF.
pub fn write_dimacs(target: &mut impl io::Write, formula: &CnfFormula) -> io::Result<()> {
    write_dimacs_header(
        &mut *target,
        DimacsHeader {
            var_count: formula.var_count(),
            clause_count: formula.len(),
        },
    )?;
    write_dimacs_clauses(&mut *target, formula.iter())
}

/// Write a model as one unit clause line per literal.
///
/// This is the solution file format: each literal is followed by ` 0` on its own line.
pub fn write_model(
    target: &mut impl io::Write,
    lits: impl IntoIterator<Item = impl Borrow<Lit>>,
) -> io::Result<()> {
    for lit in lits.into_iter() {
        itoa::write(&mut *target, lit.borrow().to_dimacs())?;
        target.write_all(b" 0\n")?;
    }
    Ok(())
}
