use anyhow::Result;
use scheduler_core::auth::Authenticator;

use crate::cli::{OutputFormat, SignInCommand};
use crate::views::response::{print_json, Response};

pub fn sign_in(auth: &dyn Authenticator, format: OutputFormat, command: SignInCommand) -> Result<()> {
    let token = auth.issue_token(&command.password)?;
    if format == OutputFormat::Json {
        print_json(&Response::token(token))
    } else {
        println!("{}", token);
        Ok(())
    }
}
