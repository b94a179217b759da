use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic employee table for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output file; `.parquet` writes Parquet, anything else CSV.
    #[arg(long, short, default_value = "hr_data.csv")]
    output: PathBuf,

    /// Number of employees.
    #[arg(long, default_value_t = 500)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// (department, base salary, salary spread, attrition probability)
const DEPARTMENTS: [(&str, f64, f64, f64); 5] = [
    ("Engineering", 92_000.0, 14_000.0, 0.12),
    ("Sales", 58_000.0, 11_000.0, 0.27),
    ("Marketing", 64_000.0, 9_000.0, 0.18),
    ("HR", 52_000.0, 7_000.0, 0.15),
    ("Finance", 71_000.0, 10_000.0, 0.10),
];

const FIRST_NAMES: [&str; 10] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Frances", "Ken", "Radia", "Linus",
];
const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Allen", "Perlman",
];

#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "EmployeeID")]
    employee_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: &'static str,
    #[serde(rename = "Salary")]
    salary: i64,
    #[serde(rename = "Age")]
    age: i64,
    #[serde(rename = "JoinDate")]
    join_date: NaiveDate,
    #[serde(rename = "Attrition")]
    attrition: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn generate_rows(count: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let first_hire = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default();

    (0..count)
        .map(|i| {
            let (department, base, spread, leave_p) = DEPARTMENTS[rng.below(DEPARTMENTS.len())];
            let age = rng.gauss(38.0, 9.0).round().clamp(21.0, 65.0) as i64;
            // Older staff earn a little more.
            let salary = rng.gauss(base + (age - 38) as f64 * 600.0, spread);
            let salary = (salary.max(25_000.0) / 100.0).round() as i64 * 100;
            let tenure_days = rng.below(15 * 365) as i64;
            let name = format!(
                "{} {}",
                FIRST_NAMES[rng.below(FIRST_NAMES.len())],
                LAST_NAMES[rng.below(LAST_NAMES.len())]
            );

            Row {
                employee_id: format!("E{:04}", i + 1),
                name,
                department,
                salary,
                age,
                join_date: first_hire + Duration::days(tenure_days),
                attrition: if rng.next_f64() < leave_p { "Yes" } else { "No" },
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("EmployeeID", DataType::Utf8, false),
        Field::new("Name", DataType::Utf8, false),
        Field::new("Department", DataType::Utf8, false),
        Field::new("Salary", DataType::Int64, false),
        Field::new("Age", DataType::Int64, false),
        Field::new("JoinDate", DataType::Date32, false),
        Field::new("Attrition", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.employee_id.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.department))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.salary))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.age))),
            Arc::new(Date32Array::from_iter_values(
                rows.iter().map(|r| (r.join_date - epoch).num_days() as i32),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.attrition))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let rows = generate_rows(args.rows, &mut rng);

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    log::info!("Wrote {} employees to {}", rows.len(), args.output.display());
    println!("Wrote {} employees to {}", rows.len(), args.output.display());
    Ok(())
}
