use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::Result;
use crate::model::User;

pub fn run(ctx: &Context, _user: &User, _args: &Args) -> Result<Reply> {
    let bytes = std::fs::read(&ctx.asset_path)?;
    let file_name = ctx
        .asset_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "lisy.png".to_string());
    Ok(Reply::Photo { file_name, bytes })
}
