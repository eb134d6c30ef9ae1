use log::{error, info};

use hashlittle2::{
    mixers::{block_mix, final_mix, hash64},
    stats::{
        compute_stats, generate_8_random_bits, generate_bit_combinations, generate_counting,
        generate_gray_code, generate_random, generate_single_1_bit, Options,
    },
};

struct Mixer<'a> {
    name: &'a str,
    mix_function: &'a dyn Fn(&[u8], &mut [u8]),
    input_size: usize,  // In bytes.
    output_size: usize, // In bytes.
    digest_size: usize, // In bytes.
}

const MIXERS: &[Mixer] = &[
    Mixer {
        name: "lookup3 block mix",
        mix_function: &block_mix::mix_input,
        input_size: block_mix::IN_SIZE_BYTES,
        output_size: block_mix::OUT_SIZE_BYTES,
        digest_size: block_mix::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "lookup3 final mix",
        mix_function: &final_mix::mix_input,
        input_size: final_mix::IN_SIZE_BYTES,
        output_size: final_mix::OUT_SIZE_BYTES,
        digest_size: final_mix::DIGEST_SIZE_BYTES,
    },
    Mixer {
        name: "hashlittle2, 24-byte keys",
        mix_function: &hash64::mix_input,
        input_size: hash64::IN_SIZE_BYTES,
        output_size: hash64::OUT_SIZE_BYTES,
        digest_size: hash64::DIGEST_SIZE_BYTES,
    },
];

struct BitPattern<'a> {
    name: &'a str,
    gen_function: &'a dyn Fn(usize, &mut [u8]),

    /// Number of rounds to run the pattern with. Zero means one round per
    /// input bit.
    rounds: usize,
}

const PATTERNS: &[BitPattern] = &[
    BitPattern {
        name: "random",
        gen_function: &generate_random,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "counting",
        gen_function: &generate_counting,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "gray code",
        gen_function: &generate_gray_code,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "bit combinations",
        gen_function: &generate_bit_combinations,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "8 random bits",
        gen_function: &generate_8_random_bits,
        rounds: 1 << 16,
    },
    BitPattern {
        name: "single-bit",
        gen_function: &generate_single_1_bit,

        // Few samples by nature, so even an ideal mixer won't reach perfect
        // avalanche or BIC here.
        rounds: 0,
    },
];

struct Config {
    options: Options,
    write_png: bool,
    rounds: Option<usize>,
    name_filters: Vec<String>,
}

fn parse_args() -> Config {
    let mut config = Config {
        options: Options::default(),
        write_png: true,
        rounds: None,
        name_filters: Vec::new(),
    };

    for arg in std::env::args().skip(1) {
        if !arg.starts_with('-') {
            config.name_filters.push(arg.to_lowercase());
        } else if arg == "--bic" {
            config.options.bic = true;
        } else if arg == "--no-png" {
            config.write_png = false;
        } else if let Some(n) = arg.strip_prefix("--rounds=") {
            match n.parse() {
                Ok(n) => config.rounds = Some(n),
                Err(_) => error!("ignoring invalid round count {:?}", n),
            }
        } else {
            error!("ignoring unknown option {:?}", arg);
        }
    }

    config
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = parse_args();

    for mixer in MIXERS.iter() {
        let lower_name = mixer.name.to_lowercase();
        if !config.name_filters.is_empty()
            && !config
                .name_filters
                .iter()
                .any(|filter| lower_name.contains(filter))
        {
            continue;
        }

        println!("\n================================");
        println!("{}", mixer.name);
        for pattern in PATTERNS.iter() {
            println!("\nInput bit pattern: {}", pattern.name);
            let rounds = match (config.rounds, pattern.rounds) {
                (_, 0) => mixer.input_size * 8,
                (Some(n), _) => n,
                (None, n) => n,
            };
            info!("{} / {}: {} rounds", mixer.name, pattern.name, rounds);

            let stats = compute_stats(
                pattern.gen_function,
                mixer.mix_function,
                mixer.input_size,
                mixer.output_size,
                mixer.digest_size,
                rounds,
                config.options,
            );
            print!("{}", stats.report());

            if config.options.avalanche && config.write_png {
                let path = format!("{} - {}.png", mixer.name, pattern.name);
                if let Err(e) = stats.write_avalanche_png(&path) {
                    error!("failed to write {:?}: {}", path, e);
                }
            }
        }
    }
}
