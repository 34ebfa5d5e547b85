//! Offline cheat sheets
//!
//! Static topic lookup for `--cheat <topic>`. No backend involved.

/// Topic name -> sheet body.
const SHEETS: &[(&str, &str)] = &[
    (
        "git",
        "git status                 # working tree state\n\
         git add -A                 # stage everything\n\
         git commit -m \"msg\"       # commit staged changes\n\
         git push                   # push current branch\n\
         git log --oneline -10      # recent history\n\
         git diff HEAD~1            # diff against previous commit\n\
         git stash / git stash pop  # shelve and restore changes",
    ),
    (
        "docker",
        "docker ps                  # running containers\n\
         docker ps -a               # all containers\n\
         docker images              # local images\n\
         docker logs -f <name>      # follow container logs\n\
         docker exec -it <name> sh  # shell into container\n\
         docker system prune        # reclaim space",
    ),
    (
        "tar",
        "tar -czf out.tar.gz dir/   # create gzipped archive\n\
         tar -xzf out.tar.gz        # extract gzipped archive\n\
         tar -tzf out.tar.gz        # list contents\n\
         tar -xzf a.tar.gz -C dest/ # extract into directory",
    ),
    (
        "find",
        "find . -name \"*.log\"              # by name\n\
         find . -size +100M -type f         # large files\n\
         find . -mtime -1                   # modified in last day\n\
         find . -type f -exec wc -l {} +    # run command on matches",
    ),
    (
        "network",
        "lsof -i :8000              # what's on a port\n\
         netstat -an | grep LISTEN  # listening sockets\n\
         ping -c 4 host             # reachability\n\
         curl -I https://host       # response headers\n\
         dig host                   # DNS lookup",
    ),
    (
        "permissions",
        "ls -l file                 # show permissions\n\
         chmod +x script.sh         # make executable\n\
         chmod 644 file             # rw-r--r--\n\
         chown user:group file      # change owner",
    ),
];

/// Look up a sheet by topic, case-insensitively.
pub fn lookup(topic: &str) -> Option<&'static str> {
    let topic = topic.trim().to_lowercase();
    SHEETS
        .iter()
        .find(|(name, _)| *name == topic)
        .map(|(_, sheet)| *sheet)
}

/// All available topics, for the error path.
pub fn topics() -> Vec<&'static str> {
    SHEETS.iter().map(|(name, _)| *name).collect()
}
