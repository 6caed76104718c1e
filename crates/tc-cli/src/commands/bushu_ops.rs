use std::path::Path;

use tc_core::bushu::Strategy;
use tc_core::dict::BushuDict;

fn open(table: &str) -> BushuDict {
    die!(
        BushuDict::open(Path::new(table)),
        "Error opening Bushu table {table}: {}"
    )
}

/// One line describing a composition attempt.
pub fn describe(a: char, b: char, result: Option<(char, Strategy)>) -> String {
    match result {
        Some((c, strategy)) => format!("{a} + {b} → {c} ({})", strategy.name()),
        None => format!("{a} + {b} → (no composition)"),
    }
}

pub fn compose(table: &str, a: char, b: char) {
    let dict = open(table);
    let result = dict.compose_explained(a, b);
    println!("{}", describe(a, b, result));
    if result.is_none() {
        std::process::exit(1);
    }
}

pub fn decompose(table: &str, c: char) {
    let dict = open(table);
    let canonical = dict.canonical(c);
    if canonical != c {
        println!("{c}: canonical form {canonical}");
    }
    match dict.decompose(canonical) {
        Some((a, b)) => println!("{canonical} → {a} + {b}"),
        None => {
            println!("{canonical} → (no decomposition)");
            std::process::exit(1);
        }
    }
}
