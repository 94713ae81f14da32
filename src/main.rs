use log::error;
mod lib;

fn main() {
    if let Err(err) = lib::run() {
        error!("{}", err);
        std::process::exit(1);
    }
    std::process::exit(0);
}
