//! The population file.
//!
//! A line-oriented text format:
//!
//! ```text
//! <generation>
//! <fitness> <w0> <w1> <w2> <w3> <w4> <w5>
//! ...one line per individual, in population order
//! ```
//!
//! Unevaluated individuals are written with fitness `-1`. When the caller expects a
//! population size, a file is only accepted if it holds exactly that many
//! individuals; nothing is returned from a partially read file.
//!
//! ```
//! use tetrevo_evaluator::feature_weights::FeatureWeights;
//! use tetrevo_training::{
//!     genetic::{Individual, Population},
//!     persistence,
//! };
//!
//! let population = Population::new(
//!     vec![
//!         Individual::with_fitness(FeatureWeights::new([-1.5, -2.0, -3.0, -4.0, -5.0, 6.25]), Some(42)),
//!         Individual::new(FeatureWeights::new([-1.0; 6])),
//!     ],
//!     7,
//! );
//! let text = persistence::format_population(&population);
//! assert_eq!(text, "7\n42 -1.5 -2 -3 -4 -5 6.25\n-1 -1 -1 -1 -1 -1 -1\n");
//! assert_eq!(persistence::parse_population(&text, Some(2))?, population);
//! # Ok::<(), persistence::PersistenceError>(())
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tetrevo_evaluator::feature_weights::FeatureWeights;

use crate::genetic::{Individual, Population};

const UNEVALUATED: i64 = -1;

/// Why a population could not be read or written.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    #[display("population file {} does not exist", path.display())]
    NotFound { path: PathBuf },
    #[display("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    /// The file ended before the header or before every expected individual was read.
    #[display("population file is truncated after {found} individuals")]
    Truncated { found: usize },
    #[display("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    /// The file holds more individuals than expected.
    #[display("population file holds more than {expected} individuals")]
    CountMismatch { expected: usize },
}

/// Renders `population` in the population file format.
#[must_use]
pub fn format_population(population: &Population) -> String {
    let mut text = format!("{}\n", population.generation());
    for individual in population.individuals() {
        let fitness = individual.fitness().map_or(UNEVALUATED, i64::from);
        let fields = std::iter::once(fitness.to_string())
            .chain(individual.weights().as_array().iter().map(f64::to_string))
            .collect::<Vec<_>>();
        text.push_str(&fields.join(" "));
        text.push('\n');
    }
    text
}

/// Parses a population file.
///
/// With `Some(population_size)` the file must hold exactly that many individuals;
/// with `None` any non-zero number is accepted. Blank lines are ignored, but line
/// numbers in errors still count them.
pub fn parse_population(
    text: &str,
    population_size: Option<usize>,
) -> Result<Population, PersistenceError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((line, header)) = lines.next() else {
        return Err(PersistenceError::Truncated { found: 0 });
    };
    let generation = header.parse().map_err(|e| PersistenceError::Malformed {
        line,
        reason: format!("invalid generation {header:?}: {e}"),
    })?;

    let mut individuals = Vec::with_capacity(population_size.unwrap_or_default());
    for (line, entry) in lines {
        if let Some(expected) = population_size.filter(|&n| individuals.len() == n) {
            return Err(PersistenceError::CountMismatch { expected });
        }
        let individual =
            parse_individual(entry).map_err(|reason| PersistenceError::Malformed { line, reason })?;
        individuals.push(individual);
    }
    if individuals.len() < population_size.unwrap_or(1) {
        return Err(PersistenceError::Truncated {
            found: individuals.len(),
        });
    }
    Ok(Population::new(individuals, generation))
}

fn parse_individual(line: &str) -> Result<Individual, String> {
    let mut fields = line.split_whitespace();
    let fitness = fields.next().unwrap_or_default();
    let fitness = match fitness.parse::<i64>() {
        Ok(UNEVALUATED) => None,
        Ok(value) => Some(
            u32::try_from(value).map_err(|_| format!("fitness {value} is out of range"))?,
        ),
        Err(e) => return Err(format!("invalid fitness {fitness:?}: {e}")),
    };
    let weights = fields
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|e| format!("invalid weight {field:?}: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(w) = weights.iter().find(|w| !w.is_finite()) {
        return Err(format!("weight {w} is not finite"));
    }
    let weights = FeatureWeights::from_slice(&weights).map_err(|e| e.to_string())?;
    Ok(Individual::with_fitness(weights, fitness))
}

/// Writes `population` to `path`, replacing the whole file.
///
/// The text goes to `<path>.tmp` first and is renamed over `path`, so a crash never
/// leaves a half-written population behind.
pub fn write_population(path: &Path, population: &Population) -> Result<(), PersistenceError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, format_population(population)).map_err(|source| PersistenceError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Reads the population stored at `path`; see [`parse_population`].
pub fn read_population(
    path: &Path,
    population_size: Option<usize>,
) -> Result<Population, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => PersistenceError::NotFound {
            path: path.to_owned(),
        },
        _ => PersistenceError::Io {
            path: path.to_owned(),
            source,
        },
    })?;
    parse_population(&text, population_size)
}
