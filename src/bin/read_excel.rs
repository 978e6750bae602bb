use sheetops::module::{Response, init_tracing};

fn main() {
    init_tracing();
    let response = sheetops::read_excel::run(std::env::args_os()).unwrap_or_else(|err| {
        eprintln!("Error reading the Excel file: {err:#}");
        Response::from(err)
    });
    std::process::exit(response.emit());
}
