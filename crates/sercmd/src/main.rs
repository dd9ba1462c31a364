fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let divisor = match args.next() {
        Some(text) => match text.parse::<u16>() {
            Ok(value) if value >= 4 => value,
            _ => {
                eprintln!("Bad divisor '{}'. Expected a whole number of at least 4.", text);
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No divisor given, running at 16 ticks per bit");
            16
        }
    };

    sercmd::run(divisor).unwrap();
}
