fn main() {
    casebook::cli::run();
}
