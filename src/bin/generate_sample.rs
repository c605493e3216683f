use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Neighborhood, zip code, approximate centre (lon, lat), weighted codes.
struct Area {
    name: &'static str,
    zip: i64,
    center: (f64, f64),
    districts: &'static [&'static str],
    codes: &'static [&'static str],
}

const AREAS: &[Area] = &[
    Area { name: "Back Bay", zip: 2116, center: (-71.081, 42.350), districts: &["1C", "1C", "1B"], codes: &["MF", "MF", "TF", "M"] },
    Area { name: "South End", zip: 2118, center: (-71.072, 42.341), districts: &["1C", "3"], codes: &["MTH", "TF", "MTH"] },
    Area { name: "Dorchester", zip: 2124, center: (-71.065, 42.297), districts: &["7", "8", "8", "9"], codes: &["W", "TH", "F", "W"] },
    Area { name: "Roxbury", zip: 2119, center: (-71.089, 42.324), districts: &["10A", "10A", "10B"], codes: &["T", "F", "TH"] },
    Area { name: "Jamaica Plain", zip: 2130, center: (-71.114, 42.310), districts: &["10B", "11"], codes: &["M", "TH", "W"] },
    Area { name: "East Boston", zip: 2128, center: (-71.034, 42.375), districts: &["4"], codes: &["T", "F"] },
    Area { name: "Charlestown", zip: 2129, center: (-71.063, 42.378), districts: &["1A"], codes: &["M", "TH"] },
    Area { name: "West Roxbury", zip: 2132, center: (-71.160, 42.280), districts: &["11", "12"], codes: &["W", "F", "T"] },
];

const STREETS: &[&str] = &[
    "Beacon St", "Tremont St", "Washington St", "Centre St", "Dudley St",
    "Dorchester Ave", "Columbus Ave", "Meridian St", "Bunker Hill St", "Blue Hill Ave",
];

const RECOLLECT: &[&str] = &["MA", "TA", "WA", "THA", "FA", "MB", "TB", "FB"];

#[derive(Serialize)]
struct Row {
    full_address: String,
    mailing_neighborhood: String,
    zip_code: Option<i64>,
    pwd_district: String,
    recollect: String,
    trashday: String,
    x_coord: f64,
    y_coord: f64,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n_rows = 7000;

    let rows: Vec<Row> = (0..n_rows)
        .map(|i| {
            let area = rng.pick(AREAS);
            let number = 1 + rng.next_u64() % 400;
            let street = rng.pick(STREETS);
            // A couple of addresses without a zip code, as in the city export.
            let zip_code = (i % 3500 != 17).then_some(area.zip);
            Row {
                full_address: format!("{number} {street} {}, MA", area.name),
                mailing_neighborhood: area.name.to_string(),
                zip_code,
                pwd_district: rng.pick(area.districts).to_string(),
                recollect: rng.pick(RECOLLECT).to_string(),
                trashday: rng.pick(area.codes).to_string(),
                x_coord: rng.gauss(area.center.0, 0.008),
                y_coord: rng.gauss(area.center.1, 0.006),
            }
        })
        .collect();

    // ---- CSV ----
    let csv_path = "sample_trash_schedule.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let text = |f: fn(&Row) -> &str| -> StringArray { rows.iter().map(|r| Some(f(r))).collect() };

    let schema = Arc::new(Schema::new(vec![
        Field::new("full_address", DataType::Utf8, false),
        Field::new("mailing_neighborhood", DataType::Utf8, false),
        Field::new("zip_code", DataType::Int64, true),
        Field::new("pwd_district", DataType::Utf8, false),
        Field::new("recollect", DataType::Utf8, false),
        Field::new("trashday", DataType::Utf8, false),
        Field::new("x_coord", DataType::Float64, false),
        Field::new("y_coord", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.full_address.as_str())),
            Arc::new(text(|r| r.mailing_neighborhood.as_str())),
            Arc::new(rows.iter().map(|r| r.zip_code).collect::<Int64Array>()),
            Arc::new(text(|r| r.pwd_district.as_str())),
            Arc::new(text(|r| r.recollect.as_str())),
            Arc::new(text(|r| r.trashday.as_str())),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.x_coord))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.y_coord))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_trash_schedule.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} addresses to {csv_path} and {parquet_path}");
}
