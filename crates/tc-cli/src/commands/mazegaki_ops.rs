use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use tc_core::dict::{MazegakiDict, MazegakiLru};
use tc_core::mazegaki::{self, FindOptions, MazegakiHit};
use tc_core::settings::settings;

pub struct LookupOptions<'a> {
    pub fixed: bool,
    pub inflection: bool,
    pub max_offset: Option<usize>,
    pub lru: Option<&'a str>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct HitReport<'a> {
    yomi: &'a str,
    key: &'a str,
    length: usize,
    offset: usize,
    candidates: &'a [String],
}

impl<'a> From<&'a MazegakiHit> for HitReport<'a> {
    fn from(hit: &'a MazegakiHit) -> Self {
        Self {
            yomi: &hit.yomi,
            key: &hit.key,
            length: hit.length,
            offset: hit.offset,
            candidates: hit.candidates(),
        }
    }
}

/// Plain-text listing, one hit per line.
pub fn format_hits(hits: &[MazegakiHit]) -> String {
    let mut out = String::new();
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!(
            "{i:>2}. {} [{}] len={} offset={}: {}\n",
            hit.yomi,
            hit.key,
            hit.length,
            hit.offset,
            hit.candidates().join(" ")
        ));
    }
    out
}

pub fn lookup(dict_file: &str, reading: &str, opts: &LookupOptions) {
    let dict = die!(
        MazegakiDict::open_any(Path::new(dict_file)),
        "Error opening dictionary: {}"
    );
    let mazegaki_settings = &settings().mazegaki;
    let lru = opts.lru.map(|path| {
        die!(
            MazegakiLru::open(Path::new(path), mazegaki_settings.lru_capacity),
            "Error opening LRU file {path}: {}"
        )
    });

    let mut find_opts = FindOptions::new(opts.fixed, opts.inflection, mazegaki_settings);
    if let Some(max_offset) = opts.max_offset {
        find_opts.max_offset = max_offset;
    }
    let hits = mazegaki::find(&dict, lru.as_ref(), reading, find_opts);

    if opts.json {
        let report: Vec<HitReport> = hits.iter().map(HitReport::from).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("JSON serialization failed")
        );
    } else if hits.is_empty() {
        println!("{reading}: (no hit)");
    } else {
        print!("{}", format_hits(&hits));
    }
}

pub fn compile(input_file: &str, output_file: &str) {
    let text = die!(
        fs::read_to_string(input_file),
        "Error reading {input_file}: {}"
    );
    let dict = MazegakiDict::parse(&text);
    info!(entries = dict.len(), "parsed text dictionary");
    die!(
        dict.save(Path::new(output_file)),
        "Error writing dictionary: {}"
    );

    let file_size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "Wrote {output_file} ({} entries, {:.1} KB)",
        dict.len(),
        file_size as f64 / 1024.0
    );
}

pub fn info(file: &str) {
    let dict = die!(
        MazegakiDict::open_any(Path::new(file)),
        "Error opening dictionary: {}"
    );
    let file_size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    let keys = dict.keys_sorted();
    let inflected = keys
        .iter()
        .filter(|k| k.ends_with(tc_core::dict::INFLECTION_MARKER))
        .count();

    println!("Dictionary: {file}");
    println!("File size:  {:.1} KB", file_size as f64 / 1024.0);
    println!("Keys:       {}", keys.len());
    println!("Inflected:  {inflected}");

    let sample_keys = ["かんじ", "にほん", "か—", "よ—"];
    println!();
    println!("Sample lookups:");
    for key in &sample_keys {
        match dict.lookup(key) {
            Some(list) => {
                let surfaces: Vec<&str> = tc_core::dict::split_candidates(list).take(5).collect();
                println!("  {key} → {}", surfaces.join(", "));
            }
            None => println!("  {key} → (not found)"),
        }
    }
}
