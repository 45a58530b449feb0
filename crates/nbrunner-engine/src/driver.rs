//! Wire format between [`KernelSession`](crate::kernel::KernelSession) and the
//! interpreter-side driver.
//!
//! The driver reads one JSON request per line on stdin, executes the cell in a
//! namespace shared by every cell of the run, and answers with one JSON reply
//! per line. Cell output written to `sys.stdout`/`sys.stderr` is captured and
//! returned in the reply. The driver keeps the original stdout descriptor as
//! its reply channel and points fd 1 at stderr, so anything a cell writes to
//! the raw descriptor (child processes, C extensions) cannot corrupt replies.

use serde::{Deserialize, Serialize};

/// Python program run with `-c` for the lifetime of one notebook run.
pub(crate) const DRIVER_SOURCE: &str = r##"
import ast
import builtins
import io
import json
import os
import sys
import traceback


def run_cell(source, namespace):
    tree = ast.parse(source, filename="<cell>", mode="exec")
    last = None
    if tree.body and isinstance(tree.body[-1], ast.Expr):
        last = ast.Expression(tree.body.pop().value)
    exec(compile(tree, "<cell>", "exec"), namespace)
    if last is not None:
        return eval(compile(last, "<cell>", "eval"), namespace)
    return None


def cell_traceback(exc):
    tb = exc.__traceback__
    while tb is not None and tb.tb_frame.f_code.co_filename != "<cell>":
        tb = tb.tb_next
    lines = traceback.format_exception(type(exc), exc, tb)
    return "".join(lines).rstrip("\n").split("\n")


def main():
    channel = os.fdopen(os.dup(1), "w", encoding="utf-8")
    os.dup2(2, 1)
    requests = sys.stdin.buffer
    namespace = {"__name__": "__main__", "__builtins__": builtins}
    while True:
        line = requests.readline()
        if not line:
            break
        source = json.loads(line)["source"]
        out, err = io.StringIO(), io.StringIO()
        sys.stdout, sys.stderr, sys.stdin = out, err, io.StringIO()
        try:
            value = run_cell(source, namespace)
            reply = {"status": "ok", "result": None if value is None else repr(value)}
        except BaseException as exc:
            reply = {
                "status": "error",
                "ename": type(exc).__name__,
                "evalue": str(exc),
                "traceback": cell_traceback(exc),
            }
        finally:
            sys.stdout, sys.stderr, sys.stdin = sys.__stdout__, sys.__stderr__, sys.__stdin__
        reply["stdout"] = out.getvalue()
        reply["stderr"] = err.getvalue()
        channel.write(json.dumps(reply) + "\n")
        channel.flush()


main()
"##;

#[derive(Debug, Serialize)]
pub(crate) struct CellRequest<'a> {
  pub source: &'a str,
}

/// The driver's answer for one executed cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum CellReply {
  Ok {
    stdout: String,
    stderr: String,
    /// `repr` of the cell's trailing expression, when it has one.
    result: Option<String>,
  },
  Error {
    stdout: String,
    stderr: String,
    ename: String,
    evalue: String,
    traceback: Vec<String>,
  },
}
