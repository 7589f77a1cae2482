//! Controllers of the demo application.

use serde::Serialize;
use serde_json::Value;
use tinyapp::prelude::*;

/// Container key of the greeting service.
pub const GREETING_KEY: &str = "greeting";

/// `main`: hello, echo, sum, services.
pub fn main_controller() -> Controller {
    Controller::builder("main")
        .action("hello", hello)
        .action("echo", echo)
        .action("sum", sum)
        .action("services", services)
        .templates([("hello", "hello"), ("services", "services")])
        .build()
}

/// `debug`: dump, shown as a tree.
pub fn debug_controller() -> Controller {
    Controller::builder("debug")
        .action("dump", dump)
        .template("dump", "tree")
        .build()
}

fn hello(ctx: &ActionContext<'_>, args: &Args) -> anyhow::Result<String> {
    let greeting: String = ctx.get(GREETING_KEY)?;
    let name = args.str(0).unwrap_or("world");
    Ok(format!("{}, {}!", greeting, name))
}

fn echo(_ctx: &ActionContext<'_>, args: &Args) -> anyhow::Result<String> {
    let words: Vec<String> = args
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    Ok(words.join(" "))
}

/// Adds the arguments; integers stay integers unless one of them is not or
/// their sum overflows.
fn sum(_ctx: &ActionContext<'_>, args: &Args) -> anyhow::Result<Value> {
    let ints: Result<Vec<i64>, _> = (0..args.len()).map(|i| args.parse::<i64>(i)).collect();
    let int_total = ints
        .ok()
        .and_then(|ints| ints.into_iter().try_fold(0i64, i64::checked_add));
    if let Some(total) = int_total {
        return Ok(Value::from(total));
    }

    let mut total = 0.0;
    for i in 0..args.len() {
        total += args.parse::<f64>(i)?;
    }
    Ok(Value::from(total))
}

#[derive(Serialize)]
struct ServiceInfo {
    key: String,
    resolved: bool,
}

#[derive(Serialize)]
struct Services {
    services: Vec<ServiceInfo>,
}

fn services(ctx: &ActionContext<'_>, _args: &Args) -> anyhow::Result<Services> {
    let container = ctx.app().container();
    let services = container
        .keys()
        .into_iter()
        .map(|key| ServiceInfo {
            resolved: container.is_resolved(&key),
            key,
        })
        .collect();
    Ok(Services { services })
}

fn dump(_ctx: &ActionContext<'_>, args: &Args) -> anyhow::Result<Vec<Value>> {
    Ok(args
        .iter()
        .map(|v| match v.as_str().map(serde_json::from_str::<Value>) {
            Some(Ok(parsed)) => parsed,
            _ => v.clone(),
        })
        .collect())
}
