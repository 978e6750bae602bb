use sheetops::module::{Response, init_tracing};

fn main() {
    init_tracing();
    let response = sheetops::mod_excel::run(std::env::args_os()).unwrap_or_else(|err| {
        eprintln!("Error modifying the Excel file: {err:#}");
        Response::from(err)
    });
    std::process::exit(response.emit());
}
