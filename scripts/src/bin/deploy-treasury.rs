use std::process::ExitCode;

use deploy_scripts::{commands::run_fixed_script, types::FixedScript};

#[tokio::main]
async fn main() -> ExitCode {
    run_fixed_script(FixedScript::Treasury).await
}
