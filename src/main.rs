use apidoc_tree::{cli, logging};

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    logging::init_logging(command_line_interface.verbose());
    command_line_interface.run()
}
