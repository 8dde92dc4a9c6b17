use std::error::Error;
use std::hash::Hash;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use num_traits::PrimInt;
use polars::datatypes::DataType;
use polars::prelude::*;
use rustc_hash::FxHashMap;

use ruranges::{
    sort_order_idx, sweep_line_cluster, sweep_line_k_nearest, sweep_line_merge,
    sweep_line_overlaps, sweep_line_subtract, ClusterOptions, MergeOptions, NearestOptions,
    OverlapOptions, OverlapPolicy, NO_MATCH,
};

/// Runs ruranges operations on headerless, tab-separated BED files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log timings at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the intervals sorted by chromosome, start and end
    Sort { input: PathBuf },
    /// Append a cluster id to every interval
    Cluster {
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        slack: i64,
    },
    /// Merge overlapping intervals and report how many were merged
    Merge {
        input: PathBuf,
        #[arg(long, default_value_t = 0)]
        slack: i64,
    },
    /// Print every overlapping pair
    Overlaps {
        input1: PathBuf,
        input2: PathBuf,
        #[arg(long, default_value_t = 0)]
        slack: i64,
    },
    /// Remove the coverage of the second file from the first
    Subtract { input1: PathBuf, input2: PathBuf },
    /// Report the k nearest intervals of the second file for the first
    Nearest {
        input1: PathBuf,
        input2: PathBuf,
        #[arg(short, default_value_t = 1)]
        k: usize,
        /// Skip overlapping intervals and keep searching outward
        #[arg(long)]
        ignore_overlaps: bool,
    },
}

/// Chromosome codes and coordinates of one BED file, with rows indexed by position.
struct Bed {
    chroms: Vec<u32>,
    starts: Vec<i64>,
    ends: Vec<i64>,
    idxs: Vec<u64>,
}

impl Bed {
    fn row(&self, names: &[String], i: u64) -> String {
        let i = i as usize;
        format!("{}\t{}\t{}", names[self.chroms[i] as usize], self.starts[i], self.ends[i])
    }
}

fn read_bed(path: &Path) -> PolarsResult<DataFrame> {
    let fields = vec![
        Field::new("column_1".into(), DataType::String),
        Field::new("column_2".into(), DataType::Int64),
        Field::new("column_3".into(), DataType::Int64),
    ];
    let schema = Schema::from_iter(fields);
    let parse_options = CsvParseOptions::default().with_separator(b'\t');

    CsvReadOptions::default()
        .with_has_header(false)
        .with_schema_overwrite(Some(Arc::new(schema)))
        .with_projection(Some(Arc::new(vec![0, 1, 2])))
        .with_rechunk(true)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}

/// Maps chromosome names to dense codes, shared across every file read with
/// the same `global_map` so that equal names get equal codes.
fn encode_strings_to_codes<T>(s: &Column, global_map: &mut FxHashMap<String, T>) -> PolarsResult<Vec<T>>
where
    T: PrimInt + Hash + TryFrom<usize>,
{
    if s.dtype() != &DataType::String {
        return Err(PolarsError::ComputeError(
            format!("Series '{}' is not String", s.name()).into(),
        ));
    }

    let str_chunked = s.str()?;
    global_map.reserve(str_chunked.len());

    str_chunked
        .into_iter()
        .map(|opt_str| {
            let val = opt_str.ok_or_else(|| {
                PolarsError::ComputeError(format!("null chromosome in '{}'", s.name()).into())
            })?;
            if let Some(&code) = global_map.get(val) {
                return Ok(code);
            }
            let code = T::try_from(global_map.len()).map_err(|_| {
                PolarsError::ComputeError("too many chromosomes for the code type".into())
            })?;
            global_map.insert(val.to_string(), code);
            Ok(code)
        })
        .collect()
}

fn load(path: &Path, global_map: &mut FxHashMap<String, u32>) -> Result<Bed, Box<dyn Error>> {
    let start = Instant::now();
    let df = read_bed(path)?;

    let chroms = encode_strings_to_codes(df.column("column_1")?, global_map)?;
    let starts = df.column("column_2")?.i64()?.cont_slice()?.to_vec();
    let ends = df.column("column_3")?.i64()?.cont_slice()?.to_vec();
    let idxs = (0..chroms.len() as u64).collect();

    log::debug!("read {} intervals from {:?} in {:?}", chroms.len(), path, start.elapsed());
    Ok(Bed {
        chroms,
        starts,
        ends,
        idxs,
    })
}

fn chromosome_names(global_map: FxHashMap<String, u32>) -> Vec<String> {
    let mut names = vec![String::new(); global_map.len()];
    for (name, code) in global_map {
        names[code as usize] = name;
    }
    names
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut global_map: FxHashMap<String, u32> = FxHashMap::default();

    match args.command {
        Command::Sort { input } => {
            let bed = load(&input, &mut global_map)?;
            let names = chromosome_names(global_map);
            for i in sort_order_idx(&bed.chroms, &bed.starts, &bed.ends, &bed.idxs)? {
                writeln!(out, "{}", bed.row(&names, i))?;
            }
        }
        Command::Cluster { input, slack } => {
            let bed = load(&input, &mut global_map)?;
            let names = chromosome_names(global_map);
            let (cluster_ids, idxs) = sweep_line_cluster(
                &bed.chroms,
                &bed.starts,
                &bed.ends,
                &bed.idxs,
                &ClusterOptions { slack },
            )?;
            for (cluster, i) in cluster_ids.into_iter().zip(idxs) {
                writeln!(out, "{}\t{}", bed.row(&names, i), cluster)?;
            }
        }
        Command::Merge { input, slack } => {
            let bed = load(&input, &mut global_map)?;
            let names = chromosome_names(global_map);
            let (idxs, starts, ends, counts) = sweep_line_merge(
                &bed.chroms,
                &bed.starts,
                &bed.ends,
                &bed.idxs,
                &MergeOptions { slack },
            )?;
            for i in 0..idxs.len() {
                let chrom = &names[bed.chroms[idxs[i] as usize] as usize];
                writeln!(out, "{}\t{}\t{}\t{}", chrom, starts[i], ends[i], counts[i])?;
            }
        }
        Command::Overlaps {
            input1,
            input2,
            slack,
        } => {
            let a = load(&input1, &mut global_map)?;
            let b = load(&input2, &mut global_map)?;
            let names = chromosome_names(global_map);
            let (idxs, idxs2) = sweep_line_overlaps(
                &a.chroms,
                &a.starts,
                &a.ends,
                &a.idxs,
                &b.chroms,
                &b.starts,
                &b.ends,
                &b.idxs,
                &OverlapOptions { slack },
            )?;
            for (i, j) in idxs.into_iter().zip(idxs2) {
                writeln!(out, "{}\t{}", a.row(&names, i), b.row(&names, j))?;
            }
        }
        Command::Subtract { input1, input2 } => {
            let a = load(&input1, &mut global_map)?;
            let b = load(&input2, &mut global_map)?;
            let names = chromosome_names(global_map);
            let (idxs, starts, ends) = sweep_line_subtract(
                &a.chroms, &a.starts, &a.ends, &a.idxs, &b.chroms, &b.starts, &b.ends, &b.idxs,
            )?;
            for i in 0..idxs.len() {
                let chrom = &names[a.chroms[idxs[i] as usize] as usize];
                writeln!(out, "{}\t{}\t{}", chrom, starts[i], ends[i])?;
            }
        }
        Command::Nearest {
            input1,
            input2,
            k,
            ignore_overlaps,
        } => {
            let a = load(&input1, &mut global_map)?;
            let b = load(&input2, &mut global_map)?;
            let names = chromosome_names(global_map);
            let options = NearestOptions {
                k,
                overlaps: if ignore_overlaps {
                    OverlapPolicy::Ignore
                } else {
                    OverlapPolicy::Include
                },
                ..Default::default()
            };
            let (idxs, idxs2, distances) = sweep_line_k_nearest(
                &a.chroms, &a.starts, &a.ends, &a.idxs, &b.chroms, &b.starts, &b.ends, &b.idxs,
                &options,
            )?;
            for ((i, j), d) in idxs.into_iter().zip(idxs2).zip(distances) {
                if j == NO_MATCH {
                    writeln!(out, "{}\t.\t-1\t-1\t-1", a.row(&names, i))?;
                } else {
                    writeln!(out, "{}\t{}\t{}", a.row(&names, i), b.row(&names, j), d)?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
