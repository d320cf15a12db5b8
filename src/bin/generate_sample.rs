use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

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

fn rating(rng: &mut SimpleRng, mean: f64) -> f64 {
    (rng.gauss(mean, 0.35).clamp(1.0, 5.0) * 10.0).round() / 10.0
}

fn write_header(sheet: &mut Worksheet, columns: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, bold)?;
    }
    Ok(())
}

const FIRST_NAMES: [&str; 12] = [
    "Ava", "Ben", "Chloe", "Dev", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas", "Kemi", "Liam",
];
const EXPERTISE: [&str; 4] = ["Data Science", "Web Development", "Design", "Business"];
const CATEGORIES: [&str; 4] = ["Technology", "Creative", "Business", "Personal Development"];
const LEVELS: [&str; 3] = ["Beginner", "Intermediate", "Advanced"];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    // Teachers: rating loosely tracks experience.
    let mut teacher_ratings = Vec::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teachers")?;
        write_header(
            sheet,
            &["TeacherID", "TeacherName", "Expertise", "YearsOfExperience", "TeacherRating"],
            &bold,
        )?;
        for (i, name) in FIRST_NAMES.iter().enumerate() {
            let row = i as u32 + 1;
            let years = 1 + rng.below(20);
            let r = rating(&mut rng, 2.6 + years as f64 * 0.1);
            teacher_ratings.push(r);
            sheet.write_string(row, 0, format!("T{:03}", i + 1))?;
            sheet.write_string(row, 1, *name)?;
            sheet.write_string(row, 2, EXPERTISE[i % EXPERTISE.len()])?;
            sheet.write_number(row, 3, years as f64)?;
            sheet.write_number(row, 4, r)?;
        }
    }

    // Courses: one per category × level, plus a few repeats.
    let mut n_courses = 0u32;
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Courses")?;
        write_header(
            sheet,
            &["CourseID", "CourseCategory", "CourseLevel", "CourseRating"],
            &bold,
        )?;
        for category in CATEGORIES {
            for level in LEVELS {
                n_courses += 1;
                let row = n_courses;
                sheet.write_number(row, 0, 100.0 + n_courses as f64)?;
                sheet.write_string(row, 1, category)?;
                sheet.write_string(row, 2, level)?;
                sheet.write_number(row, 3, rating(&mut rng, 3.8))?;
            }
        }
    }

    // Transactions: better-rated teachers sell more.
    let n_transactions = 400u32;
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Transactions")?;
        write_header(
            sheet,
            &["TransactionID", "TeacherID", "CourseID", "Amount"],
            &bold,
        )?;
        let weights: Vec<f64> = teacher_ratings.iter().map(|r| r * r).collect();
        let total: f64 = weights.iter().sum();
        for t in 1..=n_transactions {
            let mut pick = rng.next_f64() * total;
            let mut teacher = weights.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if pick < *w {
                    teacher = i;
                    break;
                }
                pick -= w;
            }
            // A handful of orphaned rows exercise the left join.
            let teacher_id = if t % 97 == 0 {
                "T999".to_string()
            } else {
                format!("T{:03}", teacher + 1)
            };
            let course = 101 + rng.below(n_courses as usize);
            let amount = (rng.gauss(49.0, 15.0).max(5.0) * 100.0).round() / 100.0;

            sheet.write_number(t, 0, t as f64)?;
            sheet.write_string(t, 1, teacher_id)?;
            sheet.write_number(t, 2, course as f64)?;
            sheet.write_number(t, 3, amount)?;
        }
    }

    let output_path = "EduPro Online Platform.xlsx";
    workbook
        .save(output_path)
        .with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {} teachers, {n_courses} courses and {n_transactions} transactions to {output_path}",
        FIRST_NAMES.len()
    );
    Ok(())
}
