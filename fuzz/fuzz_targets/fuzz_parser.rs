#![no_main]
use std::{cell::RefCell, fmt::Write as _};

use arbitrary::Unstructured;
use jasn::{ErrorKind, ParserOptions, parse_many, parse_with_options};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::Value;

// One flag byte, then what `ParserOptions::arbitrary` consumes.
const HEADER: usize = 1 + 2 * size_of::<usize>() + 2;

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

// JSON whitespace, plus a few code points that must be rejected.
static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    b"  ",
    b"\r\n",
    "\u{00A0}".as_bytes(),
    "\u{2028}".as_bytes(),
    "\u{FEFF}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        with_rng(|rng| rng.fill_bytes(&mut data[..HEADER]));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, max_size - prefix);
            prefix += append_whitespace(&mut data[prefix..], max_size - prefix);
        }

        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to eight whitespace runs, never writing more than `limit`
/// bytes. Returns the number of bytes written.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let runs = rng.random_range(1..=limit.min(8));
        let mut written = 0;
        for _ in 0..runs {
            let w = WS_TABLE[rng.random_range(0..WS_TABLE.len())];
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let len = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
    let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());

    let mut json = String::new();
    if arbitrary_json(&mut Unstructured::new(&bytes), 6, &mut json).is_err() {
        json.clear();
        json.push_str("null");
    }
    // a cut value is still interesting input
    let len = json.len().min(limit);
    data[..len].copy_from_slice(&json.as_bytes()[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Writes one JSON value drawn from `u`, nesting at most `depth` containers.
fn arbitrary_json(u: &mut Unstructured<'_>, depth: u8, out: &mut String) -> arbitrary::Result<()> {
    let choices = if depth == 0 { 6 } else { 8 };
    match u.choose_index(choices)? {
        0 => out.push_str("null"),
        1 => out.push_str(if u.arbitrary()? { "true" } else { "false" }),
        2 => {
            let n: f64 = u.arbitrary()?;
            if n.is_finite() {
                let _ = write!(out, "{n:e}");
            } else {
                out.push_str("-0.0");
            }
        }
        3 => {
            let _ = write!(out, "{}", u.arbitrary::<i64>()?);
        }
        4 | 5 => push_string(u, out)?,
        6 => {
            out.push('[');
            for i in 0..u.int_in_range(0..=4)? {
                if i > 0 {
                    out.push(',');
                }
                arbitrary_json(u, depth - 1, out)?;
            }
            out.push(']');
        }
        _ => {
            out.push('{');
            for i in 0..u.int_in_range(0..=4)? {
                if i > 0 {
                    out.push(',');
                }
                push_string(u, out)?;
                out.push(':');
                arbitrary_json(u, depth - 1, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn push_string(u: &mut Unstructured<'_>, out: &mut String) -> arbitrary::Result<()> {
    let s: String = u.arbitrary()?;
    let quoted = serde_json::to_string(&s).map_err(|_| arbitrary::Error::IncorrectFormat)?;
    out.push_str(&quoted);
    Ok(())
}

fn options(u: &mut Unstructured<'_>) -> arbitrary::Result<ParserOptions> {
    let mut options: ParserOptions = u.arbitrary()?;
    options.panic_on_error = false;
    // depth limits only matter when they are small
    options.max_depth %= 2 * jasn::DEFAULT_MAX_DEPTH;
    Ok(options)
}

fn check_one(input: &[u8], options: ParserOptions) {
    match parse_with_options(input, options) {
        Ok(doc) => {
            assert!(doc.end_offset() <= input.len());
            assert!(doc.value_count() <= options.max_values);

            let rendered = doc.to_string();
            let again = parse_with_options(rendered.as_bytes(), options)
                .unwrap_or_else(|err| panic!("rendering {rendered:?} does not parse: {err}"));
            assert_eq!(again.to_string(), rendered);
            assert_eq!(again.value_count(), doc.value_count());
        }
        Err(err) => {
            assert!(!err.is_internal(), "{err} for {input:?}");
            assert!(err.offset() <= input.len());

            // Whatever serde_json accepts under the same rules must parse too,
            // unless one of the configured limits was the reason.
            let limited = matches!(
                err.kind(),
                ErrorKind::DepthExceeded | ErrorKind::TooManyValues
            );
            if !limited && !options.allow_trailing_content {
                assert!(
                    serde_json::from_slice::<Value>(input).is_err(),
                    "serde_json accepts {input:?}, rejected with {err}"
                );
            }
        }
    }
}

fn parser(data: &[u8]) {
    let Some((&flags, rest)) = data.split_first() else {
        return;
    };
    let mut u = Unstructured::new(rest);
    let Ok(options) = options(&mut u) else {
        return;
    };
    let input = u.take_rest();

    check_one(input, options);

    if flags & 1 != 0 {
        let mut last_end = 0;
        for doc in parse_many(input, options) {
            let Ok(doc) = doc else { break };
            assert!(doc.end_offset() > last_end);
            last_end = doc.end_offset();
        }
    }
}

fuzz_target!(|data: &[u8]| parser(data));
