use anyhow::Result;

#[derive(Debug, PartialEq, Eq)]
pub enum CliCommand {
    Status {
        interface: Option<String>,
        provenance: bool,
        compact: bool,
    },
    Interfaces,
    Help,
    Version,
}

pub fn version_text() -> String {
    format!("wlanstat {}", env!("CARGO_PKG_VERSION"))
}

pub fn usage_text() -> String {
    format!(
        "{version}
Wireless association status reporter

Usage:
  wlanstat [status] [--interface <NAME>] [--provenance] [--compact]
  wlanstat interfaces
  wlanstat --help
  wlanstat --version

Options:
  -i, --interface <NAME>  Select network interface by exact name
  -p, --provenance        Annotate every reported field with its evidence source
      --compact           Render the snapshot on a single line
  -h, --help              Show this help text
  -V, --version           Show version",
        version = version_text()
    )
}

pub fn parse_cli_args<I, S>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    let _program_name = iter.next();

    let mut command: Option<String> = None;
    let mut interface: Option<String> = None;
    let mut provenance = false;
    let mut compact = false;

    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        match arg {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "status" | "interfaces" => {
                if command.as_deref().is_some_and(|existing| existing != arg) {
                    return Err(anyhow::anyhow!(
                        "Multiple commands provided. Use only one command.\n\n{}",
                        usage_text()
                    ));
                }
                command = Some(arg.to_string());
            }
            "-i" | "--interface" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("Missing value for --interface.\n\n{}", usage_text())
                })?;
                interface = Some(value.as_ref().to_string());
            }
            "-p" | "--provenance" => {
                provenance = true;
            }
            "--compact" => {
                compact = true;
            }
            _ if arg.starts_with("--interface=") => {
                let value = arg.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if value.is_empty() {
                    return Err(anyhow::anyhow!(
                        "Missing value for --interface.\n\n{}",
                        usage_text()
                    ));
                }
                interface = Some(value.to_string());
            }
            _ => {
                return Err(anyhow::anyhow!(
                    "Unknown argument: {arg}\n\n{}",
                    usage_text()
                ));
            }
        }
    }

    match command.as_deref().unwrap_or("status") {
        "status" => Ok(CliCommand::Status {
            interface,
            provenance,
            compact,
        }),
        "interfaces" => {
            if interface.is_some() || provenance || compact {
                return Err(anyhow::anyhow!(
                    "--interface/--provenance/--compact are only valid with status.\n\n{}",
                    usage_text()
                ));
            }
            Ok(CliCommand::Interfaces)
        }
        _ => unreachable!(),
    }
}
