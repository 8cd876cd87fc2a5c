//! `get` / `set` parameter handlers.

use serde::Serialize;

use kemp_api::Client;

use crate::cli::{GetArgs, GlobalOpts, SetArgs};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Change<'a> {
    param: &'a str,
    previous: String,
    value: &'a str,
}

pub async fn get(client: &Client, args: GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.all {
        let params = client.get_all(&args.param).await?;
        let out = output::render_single(
            &global.output_format(),
            &params,
            |p| output::detail_table(p.iter().map(|(k, v)| (k, v.to_owned()))),
            |p| {
                p.iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        )?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let value = client.get(&args.param).await?;
    let out = output::render_single(
        &global.output_format(),
        value.as_str(),
        |v| v.to_owned(),
        |v| v.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn set(client: &Client, args: SetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let previous = client.set(&args.param, &args.value).await?;
    let change = Change {
        param: &args.param,
        previous,
        value: &args.value,
    };
    let out = output::render_single(
        &global.output_format(),
        &change,
        |c| format!("{}: {} -> {}", c.param, c.previous, c.value),
        |c| c.previous.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
