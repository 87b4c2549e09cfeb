//! Runtime-provided types.
//!
//! Declared as PHP stubs grouped by extension and read with the same scanner
//! as project sources, so they introspect exactly like local types but
//! carry an `External` origin.

use super::{lookup_key, TypeIntrospector, TypeSignature};
use crate::model::TypeOrigin;
use crate::parser::php;
use std::collections::HashMap;

const CORE: &str = r#"<?php
interface Traversable {}
interface IteratorAggregate extends Traversable {
    public function getIterator(): Iterator;
}
interface Iterator extends Traversable {
    public function current(): mixed;
    public function next(): void;
    public function key(): mixed;
    public function valid(): bool;
    public function rewind(): void;
}
interface ArrayAccess {
    public function offsetExists(mixed $offset): bool;
    public function offsetGet(mixed $offset): mixed;
    public function offsetSet(mixed $offset, mixed $value): void;
    public function offsetUnset(mixed $offset): void;
}
interface Countable {
    public function count(): int;
}
interface Stringable {
    public function __toString(): string;
}
interface Serializable {
    public function serialize();
    public function unserialize(string $data);
}
interface Throwable extends Stringable {
    public function getMessage(): string;
    public function getCode();
    public function getFile(): string;
    public function getLine(): int;
    public function getTrace(): array;
    public function getTraceAsString(): string;
    public function getPrevious(): ?Throwable;
}
class Exception implements Throwable {
    protected $message = "";
    protected $code = 0;
    protected string $file = "";
    protected int $line = 0;
    public function __construct(string $message = "", int $code = 0, ?Throwable $previous = null) {}
    final public function getMessage(): string {}
    final public function getCode() {}
    final public function getFile(): string {}
    final public function getLine(): int {}
    final public function getTrace(): array {}
    final public function getTraceAsString(): string {}
    final public function getPrevious(): ?Throwable {}
    public function __toString(): string {}
}
class ErrorException extends Exception {
    final public function getSeverity(): int {}
}
class Error implements Throwable {
    public function __construct(string $message = "", int $code = 0, ?Throwable $previous = null) {}
    final public function getMessage(): string {}
    final public function getCode() {}
    final public function getFile(): string {}
    final public function getLine(): int {}
    final public function getTrace(): array {}
    final public function getTraceAsString(): string {}
    final public function getPrevious(): ?Throwable {}
    public function __toString(): string {}
}
class TypeError extends Error {}
class ValueError extends Error {}
class ArithmeticError extends Error {}
class DivisionByZeroError extends ArithmeticError {}
final class Closure {
    public static function fromCallable(callable $callback): Closure {}
    public function bindTo(?object $newThis, object|string|null $newScope = "static"): ?Closure {}
    public function call(object $newThis, mixed ...$args): mixed {}
}
final class Generator implements Iterator {
    public function current(): mixed {}
    public function next(): void {}
    public function key(): mixed {}
    public function valid(): bool {}
    public function rewind(): void {}
    public function send(mixed $value): mixed {}
    public function getReturn(): mixed {}
}
class stdClass {}
"#;

const SPL: &str = r#"<?php
class LogicException extends Exception {}
class BadFunctionCallException extends LogicException {}
class BadMethodCallException extends BadFunctionCallException {}
class DomainException extends LogicException {}
class InvalidArgumentException extends LogicException {}
class LengthException extends LogicException {}
class OutOfRangeException extends LogicException {}
class RuntimeException extends Exception {}
class OutOfBoundsException extends RuntimeException {}
class OverflowException extends RuntimeException {}
class RangeException extends RuntimeException {}
class UnderflowException extends RuntimeException {}
class UnexpectedValueException extends RuntimeException {}
class ArrayObject implements IteratorAggregate, ArrayAccess, Serializable, Countable {
    public function __construct(array|object $array = [], int $flags = 0, string $iteratorClass = "ArrayIterator") {}
    public function append(mixed $value): void {}
    public function count(): int {}
    public function getArrayCopy(): array {}
    public function getIterator(): Iterator {}
    public function offsetExists(mixed $key): bool {}
    public function offsetGet(mixed $key): mixed {}
    public function offsetSet(mixed $key, mixed $value): void {}
    public function offsetUnset(mixed $key): void {}
    public function serialize() {}
    public function unserialize(string $data) {}
}
class ArrayIterator implements Iterator, ArrayAccess, Serializable, Countable {
    public function __construct(array|object $array = [], int $flags = 0) {}
    public function count(): int {}
    public function current(): mixed {}
    public function key(): string|int|null {}
    public function next(): void {}
    public function rewind(): void {}
    public function valid(): bool {}
    public function offsetExists(mixed $key): bool {}
    public function offsetGet(mixed $key): mixed {}
    public function offsetSet(mixed $key, mixed $value): void {}
    public function offsetUnset(mixed $key): void {}
    public function serialize() {}
    public function unserialize(string $data) {}
}
"#;

const DATE: &str = r#"<?php
interface DateTimeInterface {
    const ATOM = "Y-m-d\TH:i:sP";
    const ISO8601 = "Y-m-d\TH:i:sO";
    const RFC3339 = "Y-m-d\TH:i:sP";
    public function format(string $format): string;
    public function getTimestamp(): int;
    public function getTimezone(): DateTimeZone|false;
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval;
}
class DateTime implements DateTimeInterface {
    public function __construct(string $datetime = "now", ?DateTimeZone $timezone = null) {}
    public function format(string $format): string {}
    public function getTimestamp(): int {}
    public function getTimezone(): DateTimeZone|false {}
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval {}
    public function modify(string $modifier): DateTime|false {}
    public function setTimestamp(int $timestamp): DateTime {}
}
class DateTimeImmutable implements DateTimeInterface {
    public function __construct(string $datetime = "now", ?DateTimeZone $timezone = null) {}
    public function format(string $format): string {}
    public function getTimestamp(): int {}
    public function getTimezone(): DateTimeZone|false {}
    public function diff(DateTimeInterface $targetObject, bool $absolute = false): DateInterval {}
    public function modify(string $modifier): DateTimeImmutable|false {}
    public function setTimestamp(int $timestamp): DateTimeImmutable {}
}
class DateTimeZone {
    public function __construct(string $timezone) {}
    public function getName(): string {}
}
class DateInterval {
    public function __construct(string $duration) {}
    public function format(string $format): string {}
}
"#;

const JSON: &str = r#"<?php
interface JsonSerializable {
    public function jsonSerialize(): mixed;
}
class JsonException extends Exception {}
"#;

/// Extension identifier → stub source.
const STUBS: &[(&str, &str)] = &[("Core", CORE), ("SPL", SPL), ("date", DATE), ("json", JSON)];

/// Fixed table of runtime types; every entry resolves as `External`.
pub struct PlatformTypes {
    types: HashMap<String, TypeSignature>,
}

impl PlatformTypes {
    pub fn new() -> Self {
        let mut types = HashMap::new();
        for (extension, stub) in STUBS {
            for mut sig in php::parse(stub) {
                sig.origin = TypeOrigin::External(extension.to_string());
                types.insert(lookup_key(&sig.name), sig);
            }
        }
        Self { types }
    }
}

impl Default for PlatformTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeIntrospector for PlatformTypes {
    fn introspect(&self, name: &str) -> Option<TypeSignature> {
        self.types.get(&lookup_key(name)).cloned()
    }
}
