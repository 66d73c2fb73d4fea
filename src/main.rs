//! Temper Engine - CLI Entry Point
//!
//! Commands:
//! - `temper monzo <interval>` - Factor an interval and show its conversions
//! - `temper temper --commas <..>` - Temper out commas over a subgroup
//! - `temper val <steps>` - Patent val of an equal division
//! - `temper approx <interval>` - Convergents and semiconvergents
//! - `temper test` - Built-in self-test

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use temper::monzo::parse_fraction;
use temper::{
    exact, parse_interval, parse_subgroup, ExtendedMonzo, Fraction, Mapping, TemperConfig,
};

#[derive(Parser)]
#[command(name = "temper")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "Extended monzo algebra and regular temperament mapping")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Factor an interval and show every conversion
    Monzo {
        /// Interval: 3/2, 7\12, 701.955, 1,5 or [-1 1>
        interval: String,
        /// Number of prime components
        #[arg(short = 'k', long, default_value = "7")]
        components: usize,
    },
    /// Temper out commas over a prime subgroup
    Temper {
        /// Commas to temper out
        #[arg(short, long, num_args = 1.., required = true)]
        commas: Vec<String>,
        /// Prime subgroup, e.g. 2.3.5
        #[arg(short, long, default_value = "2.3.5")]
        subgroup: String,
        /// Intervals to keep just
        #[arg(long, num_args = 1..)]
        constraints: Vec<String>,
        /// Weight per subgroup prime
        #[arg(short, long, num_args = 1..)]
        metric: Vec<f64>,
        /// Rescale so the octave is just
        #[arg(long)]
        pure_octaves: bool,
        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
        /// Number of prime components (overrides the config)
        #[arg(short = 'k', long)]
        components: Option<usize>,
        /// Optimizer sweeps (overrides the config)
        #[arg(long)]
        iterations: Option<usize>,
        /// Optimizer step size (overrides the config)
        #[arg(long)]
        step_size: Option<f64>,
        /// JSON file with a TemperConfig
        #[arg(long)]
        config: Option<String>,
    },
    /// Patent val of an equal division
    Val {
        /// Number of equal divisions
        steps: u32,
        /// Interval being divided
        #[arg(short, long, default_value = "2")]
        equave: String,
        /// Step offsets per prime, e.g. 0 0 1 for 17c
        #[arg(short, long, num_args = 1.., allow_negative_numbers = true)]
        warts: Vec<i64>,
        /// Number of prime components
        #[arg(short = 'k', long, default_value = "3")]
        components: usize,
    },
    /// Rational approximations of an interval
    Approx {
        /// Interval to approximate
        interval: String,
        /// Number of approximations to list
        #[arg(short, long, default_value = "8")]
        depth: usize,
        /// Odd limit for the nearest simple fraction
        #[arg(short, long, default_value = "15")]
        limit: u32,
    },
    /// Run the built-in self-test
    Test,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "temper=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Monzo { interval, components }) => {
            show_monzo(&interval, components);
        }
        Some(Commands::Temper {
            commas,
            subgroup,
            constraints,
            metric,
            pure_octaves,
            json,
            components,
            iterations,
            step_size,
            config,
        }) => {
            let config = load_config(config.as_deref(), components, iterations, step_size);
            let options = TemperOptions {
                metric: (!metric.is_empty()).then_some(metric),
                pure_octaves,
                json,
            };
            temper_commas(&commas, &subgroup, &constraints, &options, &config);
        }
        Some(Commands::Val { steps, equave, warts, components }) => {
            show_patent_val(steps, &equave, &warts, components);
        }
        Some(Commands::Approx { interval, depth, limit }) => {
            show_approximations(&interval, depth, limit);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Temper Engine v0.1.0");
            println!("Extended monzos and regular temperaments");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_meantone();
        }
    }
}

/// Print an error and exit.
fn fail(context: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}: {}", context, error);
    std::process::exit(1);
}

fn parse_or_exit(input: &str, components: usize) -> ExtendedMonzo {
    parse_interval(input, components).unwrap_or_else(|e| fail(&format!("Invalid interval '{}'", input), e))
}

fn load_config(
    path: Option<&str>,
    components: Option<usize>,
    iterations: Option<usize>,
    step_size: Option<f64>,
) -> TemperConfig {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| fail("Failed to read config", e));
            TemperConfig::from_json(&text).unwrap_or_else(|e| fail("Invalid config", e))
        }
        None => TemperConfig::default(),
    };
    if let Some(components) = components {
        config.number_of_components = components;
    }
    if let Some(iterations) = iterations {
        config.iterations = iterations;
    }
    if let Some(step_size) = step_size {
        config.step_size = step_size;
    }
    if let Err(e) = config.validate() {
        fail("Invalid config", e);
    }
    tracing::debug!(?config, "configuration loaded");
    config
}

fn show_monzo(input: &str, components: usize) {
    let monzo = parse_or_exit(input, components);

    println!("📝 {}", input);
    println!();
    println!("Monzo:    {}", monzo);
    println!("Cents:    {:.6}", monzo.total_cents());
    println!("Value:    {:.9}", monzo.value_of());
    match monzo.to_fraction() {
        Ok(f) => println!("Fraction: {}", f),
        Err(e) => println!("Fraction: - ({})", e),
    }
    match monzo.to_equal_temperament() {
        Ok((steps, equave)) => println!("Steps:    {} of {}", steps, equave),
        Err(e) => println!("Steps:    - ({})", e),
    }
    if let Ok(octave) = ExtendedMonzo::from_number(2, components) {
        if let Ok(reduced) = monzo.mmod(&octave) {
            println!("Reduced:  {} ({:.3}c)", reduced, reduced.total_cents());
        }
    }
}

struct TemperOptions {
    metric: Option<Vec<f64>>,
    pure_octaves: bool,
    json: bool,
}

#[derive(Serialize)]
struct TemperReport<'a> {
    primes: Vec<u32>,
    tempered_cents: Vec<f64>,
    errors_cents: Vec<f64>,
    mapping: &'a Mapping,
}

fn temper_commas(
    commas: &[String],
    subgroup: &str,
    constraints: &[String],
    options: &TemperOptions,
    config: &TemperConfig,
) {
    let k = config.number_of_components;
    let subgroup = parse_subgroup(subgroup).unwrap_or_else(|e| fail("Invalid subgroup", e));
    let commas: Vec<ExtendedMonzo> = commas.iter().map(|c| parse_or_exit(c, k)).collect();
    let constraints: Vec<ExtendedMonzo> = constraints.iter().map(|c| parse_or_exit(c, k)).collect();

    let mut mapping =
        Mapping::from_comma_list_with(&commas, &subgroup, options.metric.as_deref(), &constraints, config)
            .unwrap_or_else(|e| fail("Tempering failed", e));
    if options.pure_octaves {
        mapping = mapping.pure_octaves().unwrap_or_else(|e| fail("Tempering failed", e));
    }

    let tempered = mapping.tempered_cents();
    let primes: Vec<u32> = subgroup.iter().map(|&i| exact::prime(i)).collect();
    let tempered_cents: Vec<f64> = subgroup.iter().map(|&i| tempered[i]).collect();
    let errors_cents: Vec<f64> = subgroup
        .iter()
        .map(|&i| tempered[i] - exact::prime_cents(i))
        .collect();

    if options.json {
        let report = TemperReport {
            primes,
            tempered_cents,
            errors_cents,
            mapping: &mapping,
        };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => fail("Failed to serialize", e),
        }
        return;
    }

    println!("━━━ Tempered primes ━━━");
    for ((p, cents), error) in primes.iter().zip(&tempered_cents).zip(&errors_cents) {
        println!("  {:>3}: {:>12.6}c  ({:+.6}c)", p, cents, error);
    }
    println!();
    for comma in &commas {
        match mapping.apply(comma) {
            Ok(mapped) => println!("✓ {} → {:.2e}c", comma, mapped.total_cents()),
            Err(e) => fail("Mapping failed", e),
        }
    }
}

fn show_patent_val(steps: u32, equave: &str, warts: &[i64], components: usize) {
    let equave = parse_fraction(equave).unwrap_or_else(|e| fail("Invalid equave", e));
    let mapping = Mapping::from_patent_val(steps, &equave, warts, components)
        .unwrap_or_else(|e| fail("Invalid val", e));

    println!("━━━ {}-ED{} ━━━", steps, equave);
    for (i, column) in mapping.columns().iter().enumerate() {
        let step_count = column
            .to_equal_temperament()
            .map(|(fraction, _)| fraction * Fraction::from_integer(steps.into()))
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "?".into());
        println!(
            "  {:>3} → {:>4} steps  {:>10.3}c",
            exact::prime(i),
            step_count,
            column.total_cents()
        );
    }
}

fn show_approximations(input: &str, depth: usize, limit: u32) {
    let monzo = parse_or_exit(input, TemperConfig::default().number_of_components);

    println!("📝 {} ({:.6}c)", input, monzo.total_cents());
    println!();
    println!("Convergents:");
    let mut previous = None;
    for i in 0..depth {
        match monzo.get_convergent(i) {
            Ok(c) if previous.as_ref() != Some(&c) => {
                println!("  {}", c);
                previous = Some(c);
            }
            Ok(_) => break,
            Err(e) => fail("Approximation failed", e),
        }
    }
    println!();
    println!("Semiconvergents:");
    let mut previous = None;
    for i in 0..depth {
        match monzo.get_semiconvergent(i) {
            Ok(c) if previous.as_ref() != Some(&c) => {
                println!("  {}", c);
                previous = Some(c);
            }
            Ok(_) => break,
            Err(e) => fail("Approximation failed", e),
        }
    }
    println!();
    println!("Nearest within the {}-odd-limit: {}", limit, monzo.approximate_odd_limit(limit));
}

fn demo_meantone() {
    println!("━━━ Quarter-comma Meantone Demo ━━━");
    println!();

    let k = 3;
    let monzo = |s: &str| parse_or_exit(s, k);
    let mapping = Mapping::from_comma_list(&[monzo("81/80")], &[0, 1, 2], None, &[monzo("2"), monzo("5/4")])
        .unwrap_or_else(|e| fail("Tempering failed", e));

    for name in ["9/8", "10/9", "5/4", "3/2", "2/1"] {
        let just = monzo(name);
        match mapping.apply(&just) {
            Ok(tempered) => println!(
                "  {:>5}: {:>9.3}c → {:>9.3}c",
                name,
                just.total_cents(),
                tempered.total_cents()
            ),
            Err(e) => fail("Mapping failed", e),
        }
    }
    println!();
    println!("✓ 81/80 vanishes, 9/8 and 10/9 share one size");
}

fn run_self_test() {
    println!("━━━ Temper Engine Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;
    let mut check = |label: &str, ok: bool| {
        print!("{}... ", label);
        if ok {
            println!("✓");
            passed += 1;
        } else {
            println!("✗");
            failed += 1;
        }
    };
    let k = 3;
    let monzo = |s: &str| parse_interval(s, k).ok();

    // Test 1: Octave reduction
    let reduced = monzo("3")
        .zip(monzo("2"))
        .and_then(|(three, octave)| three.mmod(&octave).ok())
        .and_then(|m| m.to_fraction().ok());
    check("Octave reduction (3 mmod 2 = 3/2)", reduced == Some(exact::fraction(3, 2)));

    // Test 2: Exact fractional powers
    let root = monzo("2").map(|m| m.mul(&exact::fraction(1, 2)));
    check(
        "Fractional powers stay exact",
        root.map_or(false, |m| m.cents() == 0.0 && m.residual() == &exact::fraction(1, 1)),
    );

    // Test 3: Equal temperament round trip
    let fifth = monzo("7\\12").and_then(|m| m.to_equal_temperament().ok());
    check(
        "7\\12 round trip",
        fifth == Some((exact::fraction(7, 12), exact::fraction(2, 1))),
    );

    // Test 4: Closed-form rank 1
    let et = monzo("81/80")
        .zip(monzo("128/125"))
        .and_then(|(a, b)| Mapping::from_comma_list(&[a, b], &[0, 1, 2], None, &[]).ok())
        .map(|m| m.tempered_cents());
    check(
        "81/80 + 128/125 gives 12-EDO",
        et.map_or(false, |c| ((c[1] / c[0]) * 12.0 - 19.0).abs() < 1e-9),
    );

    // Test 5: Constrained tempering
    let meantone = monzo("81/80")
        .zip(monzo("2").zip(monzo("5/4")))
        .and_then(|(comma, (octave, third))| {
            Mapping::from_comma_list(&[comma], &[0, 1, 2], None, &[octave, third]).ok()
        });
    let tones = meantone.as_ref().and_then(|m| {
        let major = m.apply(&monzo("9/8")?).ok()?;
        let minor = m.apply(&monzo("10/9")?).ok()?;
        Some((major.total_cents(), minor.total_cents()))
    });
    check(
        "Quarter-comma meantone (9/8 = 10/9)",
        tones.map_or(false, |(a, b)| (a - b).abs() < 1e-4),
    );

    // Test 6: Patent val
    let val = Mapping::from_patent_val(12, &exact::fraction(2, 1), &[], k)
        .ok()
        .and_then(|m| m.apply(&monzo("3/2")?).ok())
        .and_then(|m| m.to_equal_temperament().ok());
    check(
        "12p maps 3/2 to 7\\12",
        val == Some((exact::fraction(7, 12), exact::fraction(2, 1))),
    );

    // Test 7: Semiconvergents
    let pi = ExtendedMonzo::from_value(std::f64::consts::PI, k)
        .ok()
        .and_then(|m| m.get_semiconvergent(4).ok());
    check("Semiconvergents of pi reach 22/7", pi == Some(exact::fraction(22, 7)));

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
