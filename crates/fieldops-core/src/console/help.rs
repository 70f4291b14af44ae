//! Console help text.

/// Overview printed by a bare `help`.
pub const OVERVIEW: &[&str] = &[
    "Use 'help [command]' to get more information about a particular console command.",
    "",
    "    automate [var] [val] [hi/low] Configure simple automation for actions",
    "    clear/cls                     Clear the console",
    "    help [cmd]                    Display this help text, or help text for a specific command",
    "    log [en/dis] [type]           Enable or disable logging for events and actions",
    "    skill [action] [name]         Level or display info about your skills",
    "    start [type] [name]           Start an action",
    "    stop                          Stops your current action",
];

/// Detailed help for one command, or `None` for an unknown topic.
pub fn topic(name: &str) -> Option<&'static [&'static str]> {
    let lines: &'static [&'static str] = match name.to_lowercase().as_str() {
        "automate" => &[
            "automate [var] [val] [hi/low]",
            "",
            "A simple way to automate your actions. This command lets you automatically switch \
             between two actions based on your current stamina.",
            "",
            "The first way to use this command is to set the actions you want to automate and \
             the stamina thresholds at which to switch. The first argument is the action type \
             or 'stamina', the second is the action name or threshold value, and the third is \
             'hi' or 'low'.",
            "",
            "    automate general training low",
            "    automate contract \"Bounty Hunter\" hi",
            "    automate stamina 100 low",
            "    automate stamina 300 hi",
            "",
            "After setting both actions, use 'automate en' to enable automation and \
             'automate dis' to disable it. 'automate status' shows the current settings.",
        ],
        "clear" | "cls" => &["clear/cls", "", "Clears the console"],
        "help" => &[
            "help [command]",
            "",
            "Running 'help' with no arguments displays the general help text, which lists all \
             console commands. Passing a command name shows its detailed help.",
        ],
        "log" => &[
            "log [en/dis] [type]",
            "",
            "Enable or disable logging. By default the results of completed actions and random \
             events are logged to the console. The first argument is 'en' or 'dis'; the second \
             is one of:",
            "",
            "    general      Logging for general actions",
            "    contracts    Logging for contracts",
            "    ops          Logging for operations",
            "    blackops     Logging for black operations",
            "    events       Logging for random events",
            "    all          All of the above",
        ],
        "skill" => &[
            "skill [action] [name]",
            "",
            "Level or display information about your skills.",
            "",
            "    skill list                       Display the level of every owned skill",
            "    skill list \"Blade's Intuition\"   Display the level of one skill",
            "    skill level Cloak                Buy one level of a skill",
        ],
        "start" => &[
            "start [type] [name]",
            "",
            "Start an action. Valid types are 'general', 'contract', 'op' and 'blackop'. \
             Names with spaces must be quoted.",
            "",
            "    start general training",
            "    start contract \"Bounty Hunter\"",
            "    start op \"Stealth Retirement Operation\"",
        ],
        "stop" => &["stop", "", "Stop your current action and go idle."],
        _ => return None,
    };
    Some(lines)
}
