#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate quick_error;
extern crate genegroup;
extern crate itertools;
extern crate pretty_env_logger;

use std::io::{self, Write};
use std::process;

mod cli;
mod tools;
mod utils;


quick_error! {
    #[derive(Debug)]
    pub enum Error {
        Gene(err: genegroup::Error) {
            display("{}", err)
            from()
            source(err)
        }
        Gff(err: genegroup::GffError) {
            display("{}", err)
            from()
            source(err)
        }
        Io(err: io::Error) {
            display("{}", err)
            from()
            source(err)
        }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;


fn main() {
    pretty_env_logger::init();
    let matches = cli::build_cli().get_matches();
    if let Err(err) = cli::run(matches) {
        let _ = writeln!(io::stderr(), "error: {}", err);
        process::exit(1);
    }
    process::exit(0);
}
