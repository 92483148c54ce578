//! Chatroom Bot
//!
//! Joins the relay under its process id and chats from the console.
//!
//! Usage: `bot <name> [relay-addr]`

use std::process;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::Mutex;

use chatroom_relay::agent::{
    BotIdentity, DEFAULT_RELAY_ADDR, RelayClient, client_id_for_pid, read_messages, write_messages,
};
use chatroom_relay::protocol::Outcome;

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "bot".to_string());
    let Some(name) = args.next() else {
        println!("Chatbot Help: Usage {} bot_name [relay_addr]", program);
        process::exit(1);
    };
    let addr = args.next().unwrap_or_else(|| DEFAULT_RELAY_ADDR.to_string());
    let Some(id) = client_id_for_pid(process::id()) else {
        println!("Process id {} cannot be used as a client id", process::id());
        process::exit(1);
    };

    let mut client = match RelayClient::connect(&addr).await {
        Ok(client) => client,
        Err(e) => {
            println!("Open failed for {} - {}: {}", name, id, e);
            process::exit(2);
        }
    };

    match client.join(id, &name).await {
        Ok(Outcome::Joined) => println!("You joined as {} with pid = {}", name, id),
        Ok(_) | Err(_) => {
            println!("Joining chatroom failed for {} - {}", name, id);
            process::exit(3);
        }
    }

    let bot = BotIdentity { id, name };
    let client = Arc::new(Mutex::new(client));
    let quit = Arc::new(AtomicBool::new(false));

    let reader = tokio::spawn(read_messages(
        Arc::clone(&client),
        bot.clone(),
        Arc::clone(&quit),
    ));
    write_messages(client, bot.clone(), quit).await;
    let _ = reader.await;

    println!("{} - {} leaving the chat", bot.name, bot.id);
}
